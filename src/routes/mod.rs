pub mod generate_recipe;
pub mod pages;
