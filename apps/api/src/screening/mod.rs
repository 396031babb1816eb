pub mod extract;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod page;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;
