pub mod analyst_creator;
