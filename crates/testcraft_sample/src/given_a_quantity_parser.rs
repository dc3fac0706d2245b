use std::num::ParseIntError;

use crate::sut::parse_quantity;

#[derive(Default)]
pub struct WhenParsingQuantities {
    input: String,
    parsed: Option<u8>,
}

#[testcraft::fixture]
impl WhenParsingQuantities {
    #[setup]
    fn reset(&mut self) {
        self.input.clear();
        self.parsed = None;
    }

    #[test]
    fn it_should_read_digits(&mut self) -> Result<(), ParseIntError> {
        self.input.push_str(" 42 ");
        self.parsed = Some(parse_quantity(&self.input)?);
        assert_eq!(self.parsed, Some(42));
        Ok(())
    }

    #[test]
    #[expected_failure(kind = std::num::ParseIntError, message = "Invalid digit found in string")]
    fn it_should_reject_words(&mut self) -> Result<(), ParseIntError> {
        self.input.push_str("forty-two");
        parse_quantity(&self.input).map(drop)
    }

    #[test]
    #[expected_failure(kind = std::num::ParseIntError)]
    fn it_should_reject_quantities_above_a_byte(&mut self) -> Result<(), ParseIntError> {
        self.input.push_str("255");
        parse_quantity(&self.input).map(drop)
    }
}
