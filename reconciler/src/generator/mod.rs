pub mod staircase;
