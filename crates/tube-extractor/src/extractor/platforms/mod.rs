pub mod peertube;
