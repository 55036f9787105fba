pub mod games;
pub mod openings;
pub mod players;
pub mod pool;
