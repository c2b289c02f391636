pub mod csv_generator;
