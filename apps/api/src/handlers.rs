pub mod groups;
pub mod health;
pub mod nipsa;

#[cfg(test)]
pub(crate) mod test_support;
