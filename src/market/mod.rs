pub mod rate_matrix;
