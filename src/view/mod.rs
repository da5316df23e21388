pub mod best_guess;
pub mod ranked_list;
pub mod screen;
