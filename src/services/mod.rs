pub mod perception;
