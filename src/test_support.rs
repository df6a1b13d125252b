use core::convert::Infallible;

use ufmt::uWrite;

/// Output capture standing in for the serial console in tests.
pub struct Sink<'a>(pub &'a mut String);

impl<'a> uWrite for Sink<'a> {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.0.push_str(s);
        Ok(())
    }
}
