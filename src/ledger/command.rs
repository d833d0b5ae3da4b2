pub mod issue_book_cmd;
pub mod my_books_cmd;
pub mod return_book_cmd;
