//! Attribute macro for testcraft fixtures.
//!
//! `#[testcraft::fixture]` goes on an inherent `impl` block. Methods in the block are marked with
//! role attributes, which the macro strips and turns into registration records:
//! - `#[test]`: a test method
//! - `#[setup]` / `#[teardown]`: run around every test
//! - `#[fixture_setup]` / `#[fixture_teardown]`: run once around all tests of the fixture
//! - `#[expected_failure(kind = Path, message = "...")]`: on a test, both arguments optional
//!
//! The generated code implements `testcraft::Fixture` and submits the entry to the link-time
//! registry, so the runner finds the type without any reflection.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{Error, FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, LitStr, Meta, Path, Type, parse_macro_input};

/// Registers an `impl` block's type as a test fixture.
///
/// # Example
/// ```ignore
/// #[derive(Default)]
/// struct WhenParsing { input: String }
///
/// #[testcraft::fixture]
/// impl WhenParsing {
///     #[setup]
///     fn setup(&mut self) {
///         self.input = "42".into();
///     }
///
///     #[test]
///     fn it_parses(&mut self) -> Result<(), std::num::ParseIntError> {
///         self.input.parse::<i32>().map(|_| ())
///     }
///
///     #[test]
///     #[expected_failure(kind = std::num::ParseIntError)]
///     fn it_rejects_words(&mut self) -> Result<(), std::num::ParseIntError> {
///         "forty-two".parse::<i32>().map(|_| ())
///     }
/// }
/// ```
///
/// The type is built with `Default::default()` unless `new = path` names a
/// `fn() -> Result<Self, E>` constructor.
#[proc_macro_attribute]
pub fn fixture(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut options = FixtureOptions::default();
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("new") {
            options.constructor = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported fixture option, expected `new = path`"))
        }
    });
    parse_macro_input!(args with parser);

    let item = parse_macro_input!(input as ItemImpl);
    expand(options, item).unwrap_or_else(Error::into_compile_error).into()
}

#[derive(Default)]
struct FixtureOptions {
    constructor: Option<Path>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    Test,
    Setup,
    Teardown,
    FixtureSetup,
    FixtureTeardown,
}

impl Role {
    fn from_ident(ident: &Ident) -> Option<Self> {
        match ident.to_string().as_str() {
            "test" => Some(Role::Test),
            "setup" => Some(Role::Setup),
            "teardown" => Some(Role::Teardown),
            "fixture_setup" => Some(Role::FixtureSetup),
            "fixture_teardown" => Some(Role::FixtureTeardown),
            _ => None,
        }
    }

    fn attribute(self) -> &'static str {
        match self {
            Role::Test => "test",
            Role::Setup => "setup",
            Role::Teardown => "teardown",
            Role::FixtureSetup => "fixture_setup",
            Role::FixtureTeardown => "fixture_teardown",
        }
    }

    fn kind_tokens(self) -> TokenStream2 {
        match self {
            Role::Test => quote!(::testcraft::MethodKind::Test),
            Role::Setup => quote!(::testcraft::MethodKind::Setup),
            Role::Teardown => quote!(::testcraft::MethodKind::Teardown),
            Role::FixtureSetup => quote!(::testcraft::MethodKind::FixtureSetup),
            Role::FixtureTeardown => quote!(::testcraft::MethodKind::FixtureTeardown),
        }
    }
}

struct Expected {
    kind: Option<Path>,
    message: Option<LitStr>,
}

struct Registered {
    method: Ident,
    role: Role,
    expected: Option<Expected>,
}

fn expand(options: FixtureOptions, mut item: ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(Error::new(path.span(), "#[fixture] must be placed on an inherent impl block"));
    }
    if !item.generics.params.is_empty() {
        return Err(Error::new(item.generics.span(), "#[fixture] does not support generic types"));
    }

    let self_ty = item.self_ty.clone();
    let type_name = type_name(&self_ty)?;

    let mut registered = Vec::new();
    for impl_item in &mut item.items {
        if let ImplItem::Fn(method) = impl_item {
            if let Some(entry) = take_role(method)? {
                registered.push(entry);
            }
        }
    }
    reject_duplicate_hooks(&registered)?;

    let invokers: Vec<Ident> = registered
        .iter()
        .enumerate()
        .map(|(i, r)| format_ident!("__testcraft_invoke_{}_{}", i, r.method))
        .collect();

    let invoke_fns = registered.iter().zip(&invokers).map(|(r, invoker)| {
        let method = &r.method;
        quote! {
            fn #invoker(
                instance: &mut dyn ::core::any::Any,
            ) -> ::core::result::Result<(), ::testcraft::BoxError> {
                let fixture = ::testcraft::downcast_fixture::<#self_ty>(instance)?;
                ::testcraft::TestReturn::into_result(<#self_ty>::#method(fixture))
            }
        }
    });

    let descriptors = registered.iter().zip(&invokers).map(|(r, invoker)| {
        let name = r.method.to_string();
        let kind = r.role.kind_tokens();
        let descriptor = quote!(::testcraft::MethodDescriptor::new(#name, #kind, #invoker));
        match &r.expected {
            None => descriptor,
            Some(expected) => {
                let kind = match &expected.kind {
                    Some(path) => {
                        let label = path_label(path);
                        quote!(::core::option::Option::Some(::testcraft::FailureKind::of::<#path>(#label)))
                    }
                    None => quote!(::core::option::Option::None),
                };
                let message = match &expected.message {
                    Some(lit) => quote!(::core::option::Option::Some(#lit)),
                    None => quote!(::core::option::Option::None),
                };
                quote!(#descriptor.expecting(::testcraft::ExpectedFailure::new(#kind, #message)))
            }
        }
    });

    let construct_body = match &options.constructor {
        None => quote! {
            ::core::result::Result::Ok(::std::boxed::Box::new(<#self_ty as ::core::default::Default>::default()))
        },
        Some(path) => {
            let constructor = qualify_self(path, &self_ty);
            quote! {
                #constructor()
                    .map(|fixture: #self_ty| ::std::boxed::Box::new(fixture) as ::std::boxed::Box<dyn ::core::any::Any>)
                    .map_err(::core::convert::Into::into)
            }
        }
    };

    Ok(quote! {
        #item

        const _: () = {
            #(#invoke_fns)*

            fn __testcraft_construct()
            -> ::core::result::Result<::std::boxed::Box<dyn ::core::any::Any>, ::testcraft::BoxError> {
                #construct_body
            }

            impl ::testcraft::Fixture for #self_ty {
                const ENTRY: ::testcraft::TypeEntry = ::testcraft::TypeEntry {
                    namespace: ::core::module_path!(),
                    name: #type_name,
                    is_fixture: true,
                    construct: __testcraft_construct,
                    methods: &[#(#descriptors),*],
                };
            }

            ::testcraft::inventory::submit! {
                <#self_ty as ::testcraft::Fixture>::ENTRY
            }
        };
    })
}

/// Strips role attributes from `method` and returns its registration, if it has a role.
fn take_role(method: &mut ImplItemFn) -> syn::Result<Option<Registered>> {
    let mut role: Option<Role> = None;
    let mut expected: Option<Expected> = None;
    let mut kept = Vec::with_capacity(method.attrs.len());

    for attr in std::mem::take(&mut method.attrs) {
        let path = attr.path();
        if let Some(found) = path.get_ident().and_then(Role::from_ident) {
            if let Some(previous) = role {
                return Err(Error::new(
                    attr.span(),
                    format!(
                        "`{}` is already marked #[{}]; a method has a single role",
                        method.sig.ident,
                        previous.attribute()
                    ),
                ));
            }
            role = Some(found);
        } else if path.is_ident("expected_failure") {
            if expected.is_some() {
                return Err(Error::new(attr.span(), "duplicate #[expected_failure]"));
            }
            expected = Some(parse_expected(&attr)?);
        } else {
            kept.push(attr);
        }
    }
    method.attrs = kept;

    let Some(role) = role else {
        if expected.is_some() {
            return Err(Error::new(
                method.sig.ident.span(),
                "#[expected_failure] is only allowed on #[test] methods",
            ));
        }
        return Ok(None);
    };
    if expected.is_some() && role != Role::Test {
        return Err(Error::new(
            method.sig.ident.span(),
            "#[expected_failure] is only allowed on #[test] methods",
        ));
    }
    check_signature(method)?;

    Ok(Some(Registered {
        method: method.sig.ident.clone(),
        role,
        expected,
    }))
}

fn parse_expected(attr: &syn::Attribute) -> syn::Result<Expected> {
    let mut expected = Expected {
        kind: None,
        message: None,
    };
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(expected);
    }
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("kind") {
            expected.kind = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("message") {
            expected.message = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("expected `kind = Path` or `message = \"...\"`"))
        }
    })?;
    Ok(expected)
}

fn check_signature(method: &ImplItemFn) -> syn::Result<()> {
    let sig = &method.sig;
    if sig.asyncness.is_some() {
        return Err(Error::new(sig.asyncness.span(), "fixture methods cannot be async"));
    }
    if !sig.generics.params.is_empty() {
        return Err(Error::new(sig.generics.span(), "fixture methods cannot be generic"));
    }
    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() => {}
        _ => {
            return Err(Error::new(
                sig.ident.span(),
                "fixture methods must take `&self` or `&mut self`",
            ));
        }
    }
    if let Some(extra) = inputs.next() {
        return Err(Error::new(extra.span(), "fixture methods take no arguments besides the receiver"));
    }
    Ok(())
}

fn reject_duplicate_hooks(registered: &[Registered]) -> syn::Result<()> {
    for (i, r) in registered.iter().enumerate() {
        if r.role == Role::Test {
            continue;
        }
        if let Some(earlier) = registered[..i].iter().find(|e| e.role == r.role) {
            return Err(Error::new(
                r.method.span(),
                format!(
                    "only one #[{}] is allowed per fixture (already declared on `{}`)",
                    r.role.attribute(),
                    earlier.method
                ),
            ));
        }
    }
    Ok(())
}

fn type_name(ty: &Type) -> syn::Result<String> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .ok_or_else(|| Error::new(ty.span(), "expected a named type")),
        _ => Err(Error::new(ty.span(), "#[fixture] must be placed on an impl of a named type")),
    }
}

fn path_label(path: &Path) -> String {
    path.segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

/// `Self::make` is written inside the impl, but the constructor is called from outside it.
fn qualify_self(path: &Path, self_ty: &Type) -> TokenStream2 {
    let mut segments = path.segments.iter();
    match segments.next() {
        Some(first) if first.ident == "Self" && path.leading_colon.is_none() => {
            let rest: Vec<_> = segments.collect();
            quote!(<#self_ty> #(:: #rest)*)
        }
        _ => quote!(#path),
    }
}
