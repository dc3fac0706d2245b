//! testcraft launcher entry point

fn main() {
    testcraft::cli::run();
}
