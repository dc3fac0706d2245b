//! The system under test.

use std::io;
use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("buffer holds at most {capacity} items")]
pub struct BufferOverflow {
    pub capacity: usize,
}

#[derive(Debug, Default)]
pub struct SampleSut {
    buffer: Vec<u32>,
}

impl SampleSut {
    pub const CAPACITY: usize = 4;

    /// Looks up a file that never exists.
    pub fn something_else(&self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::NotFound, "settings.toml was not found"))
    }

    pub fn push(&mut self, value: u32) -> Result<(), BufferOverflow> {
        if self.buffer.len() == Self::CAPACITY {
            return Err(BufferOverflow {
                capacity: Self::CAPACITY,
            });
        }
        self.buffer.push(value);
        Ok(())
    }
}

pub fn parse_quantity(input: &str) -> Result<u8, ParseIntError> {
    input.trim().parse()
}
