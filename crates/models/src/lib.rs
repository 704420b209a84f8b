pub mod errors;
pub mod db;
pub mod office;

#[cfg(test)]
mod tests;
