use error_stack::Report;
use vodca::{AsRefln, Fromln};

use crate::KernelError;

/// Edition numbers start at 1.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Fromln, AsRefln)]
pub struct EditionNumber(i32);

impl EditionNumber {
    pub fn new(edition: impl Into<i32>) -> error_stack::Result<Self, KernelError> {
        let edition = edition.into();
        if edition < 1 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("edition number must be at least 1, got {edition}")));
        }
        Ok(Self(edition))
    }
}
