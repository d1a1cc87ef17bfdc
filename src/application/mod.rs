pub mod load_generator;
