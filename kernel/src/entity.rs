mod author;
mod authorship;
mod bibliography;
mod book;
mod common;

pub use self::{author::*, authorship::*, bibliography::*, book::*, common::*};
