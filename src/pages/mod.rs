pub mod compose;
pub mod inbox;
pub mod vacation;

#[cfg(test)]
pub mod testing;
