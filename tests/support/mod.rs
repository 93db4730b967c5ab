pub mod symmetry;
