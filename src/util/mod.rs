/*!
Types and routines shared by every kind of search.
*/

pub mod captures;
pub mod iter;
pub mod search;

pub(crate) mod utf8;
