use std::io;

/// Never constructed, so never run: its constructor always fails.
pub struct WhenTheServiceIsUnreachable;

#[testcraft::fixture(new = Self::connect)]
impl WhenTheServiceIsUnreachable {
    fn connect() -> io::Result<Self> {
        Err(io::Error::new(io::ErrorKind::ConnectionRefused, "127.0.0.1:9 refused the connection"))
    }

    #[test]
    fn it_should_not_be_reported(&self) {
        panic!("a fixture that cannot be built must not run");
    }
}
