mod author;
mod authorship;
mod book;

pub use self::{author::*, authorship::*, book::*};
