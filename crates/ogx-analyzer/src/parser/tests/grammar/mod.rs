mod definitions_tests;
mod expressions_tests;
mod statements_tests;
mod trivia_tests;
