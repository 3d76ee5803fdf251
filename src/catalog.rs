//! The fixed book catalog served by `/books` and ranked by the recommenders.

use crate::models::Book;

const COVER_BASE: &str = "https://covers.openlibrary.org/b/id";

/// Read-only list of books, built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// The seven titles the store ships with, in display order.
    pub fn builtin() -> Self {
        let entries: [(&str, &str, &str, f64, f64, &str); 7] = [
            ("The Raven", "Edgar Allan Poe", "Poetry", 12.99, 4.5, "8231856"),
            ("1984", "George Orwell", "Dystopian", 15.99, 4.7, "7222246"),
            ("Pride and Prejudice", "Jane Austen", "Romance", 10.99, 4.6, "8235647"),
            ("The Great Gatsby", "F. Scott Fitzgerald", "Classics", 13.99, 4.4, "7222281"),
            ("To Kill a Mockingbird", "Harper Lee", "Drama", 14.99, 4.8, "8228691"),
            ("Moby Dick", "Herman Melville", "Adventure", 16.99, 4.2, "7883312"),
            ("Jane Eyre", "Charlotte Brontë", "Romance", 11.99, 4.7, "8236475"),
        ];

        let books = entries
            .iter()
            .zip(1..)
            .map(|(&(title, author, genre, price, rating, cover), id)| Book {
                id,
                title: title.to_string(),
                author: author.to_string(),
                genre: genre.to_string(),
                price,
                rating,
                image: format!("{COVER_BASE}/{cover}-L.jpg"),
            })
            .collect();

        Self::new(books)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }
}
