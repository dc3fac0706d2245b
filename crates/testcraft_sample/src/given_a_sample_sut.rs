use std::io;

use crate::sut::SampleSut;

#[derive(Default)]
pub struct WhenSomethingElseIsCalled {
    sut: SampleSut,
}

#[testcraft::fixture]
impl WhenSomethingElseIsCalled {
    #[test]
    #[expected_failure(kind = std::io::Error)]
    fn it_should_raise_an_expected_error(&self) -> io::Result<()> {
        self.sut.something_else()
    }

    #[test]
    fn it_should_raise_an_unexpected_error(&mut self) {
        for value in 0..=SampleSut::CAPACITY as u32 {
            if let Err(err) = self.sut.push(value) {
                panic!("{err}");
            }
        }
    }
}
