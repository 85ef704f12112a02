use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct Copyright(String);

impl Copyright {
    pub fn new(copyright: impl Into<String>) -> Self {
        Self(copyright.into())
    }
}
