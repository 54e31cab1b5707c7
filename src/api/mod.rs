pub mod attendance;
pub mod payroll;

#[cfg(test)]
pub(crate) mod test_support;
