use kernel::KernelError;

use crate::error::ConvertError;

pub mod database;
mod error;

/// Process environment first, then `.env`.
pub(crate) fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key)
        .convert_error()
        .map_err(|report| report.attach_printable(format!("missing configuration: {key}")))
}
