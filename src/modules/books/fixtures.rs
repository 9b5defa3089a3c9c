//! Sample catalog used by `stacks seed`.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::models::NewBook;

const GENRES: &[&str] = &[
    "Fiction",
    "Non-Fiction",
    "Science Fiction",
    "Fantasy",
    "Mystery",
    "Thriller",
    "Romance",
    "Horror",
    "Biography",
    "History",
    "Adventure",
    "Children's",
    "Young Adult",
    "Dystopian",
    "Magical Realism",
    "Gothic Fiction",
    "Historical Fiction",
    "Psychological Fiction",
    "Classic",
];

const AUTHORS: &[&str] = &[
    "J.K. Rowling",
    "Stephen King",
    "George R.R. Martin",
    "Dan Brown",
    "John Grisham",
    "J.R.R. Tolkien",
    "Agatha Christie",
    "Jane Austen",
    "Ernest Hemingway",
    "Mark Twain",
    "Gabriel García Márquez",
    "Leo Tolstoy",
    "Fyodor Dostoevsky",
    "Virginia Woolf",
    "Charles Dickens",
    "Harper Lee",
    "F. Scott Fitzgerald",
    "George Orwell",
    "Aldous Huxley",
    "Oscar Wilde",
];

const TITLE_PREFIXES: &[&str] = &[
    "The", "A", "My", "Our", "Their", "Your", "Her", "His", "One", "Last", "First", "New", "Old",
    "Secret", "Lost", "Hidden", "Forgotten", "Eternal", "Endless", "Dark", "Bright", "Silent",
    "Loud", "Mysterious", "Magical",
];

const TITLE_NOUNS: &[&str] = &[
    "Tale", "Story", "Chronicles", "Adventure", "Journey", "Quest", "Mystery", "Secret", "Legacy",
    "History", "Life", "Path", "Road", "Garden", "Forest", "Mountain", "River", "Ocean", "Sky",
    "Star", "Moon", "Sun", "World", "Universe", "Mind", "Heart", "Soul", "Spirit", "Dreams",
    "Shadows", "Light", "Darkness", "Hope", "Love", "Destiny", "Fate",
];

const TITLE_SUFFIXES: &[&str] = &[
    "of Time",
    "of Love",
    "of Destiny",
    "of Shadows",
    "of Light",
    "of Fire",
    "of Ice",
    "of the Sea",
    "of the Sky",
    "of the Forest",
    "of the Mountains",
    "of Dreams",
    "of Hope",
    "of Despair",
    "of Life",
    "of Death",
    "in Bloom",
    "in Winter",
    "in Summer",
    "in the Dark",
    "in the Light",
    "Untold",
    "Forgotten",
    "Remembered",
    "Revisited",
    "Found",
    "Lost",
];

/// (title, author, isbn, publication date, genre)
const POPULAR_BOOKS: &[(&str, &str, &str, &str, &str)] = &[
    ("To Kill a Mockingbird", "Harper Lee", "978-0-06-112008-4", "1960-07-11", "Fiction"),
    ("1984", "George Orwell", "978-0-452-28423-4", "1949-06-08", "Dystopian"),
    ("The Great Gatsby", "F. Scott Fitzgerald", "978-0-7432-7356-5", "1925-04-10", "Fiction"),
    (
        "Harry Potter and the Philosopher's Stone",
        "J.K. Rowling",
        "978-0-7475-3269-6",
        "1997-06-26",
        "Fantasy",
    ),
    ("The Lord of the Rings", "J.R.R. Tolkien", "978-0-618-64015-7", "1954-07-29", "Fantasy"),
    ("Pride and Prejudice", "Jane Austen", "978-0-14-143951-8", "1813-01-28", "Romance"),
    ("The Hobbit", "J.R.R. Tolkien", "978-0-618-00221-4", "1937-09-21", "Fantasy"),
    ("The Hunger Games", "Suzanne Collins", "978-0-439-02348-1", "2008-09-14", "Science Fiction"),
    ("The Da Vinci Code", "Dan Brown", "978-0-385-50420-5", "2003-03-18", "Mystery Thriller"),
    ("The Shining", "Stephen King", "978-0-385-12167-5", "1977-01-28", "Horror"),
];

/// Build `count` books: the well-known titles first (unless `generated_only`), then
/// randomly assembled ones.
pub fn sample_books<R: Rng + ?Sized>(rng: &mut R, count: usize, generated_only: bool) -> Vec<NewBook> {
    let mut books: Vec<NewBook> = if generated_only {
        Vec::new()
    } else {
        POPULAR_BOOKS
            .iter()
            .take(count)
            .filter_map(|(title, author, isbn, date, genre)| {
                Some(NewBook {
                    title: title.to_string(),
                    author: author.to_string(),
                    isbn: isbn.to_string(),
                    publication_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?,
                    genre: genre.to_string(),
                    copies: rng.gen_range(1..=20),
                })
            })
            .collect()
    };

    let today = Utc::now().date_naive();
    while books.len() < count {
        books.push(NewBook {
            title: random_title(rng),
            author: pick(rng, AUTHORS),
            isbn: random_isbn13(rng),
            publication_date: random_date(rng, today),
            genre: pick(rng, GENRES),
            copies: rng.gen_range(1..=20),
        });
    }

    books
}

fn pick<R: Rng + ?Sized>(rng: &mut R, items: &[&str]) -> String {
    items.choose(rng).copied().unwrap_or_default().to_string()
}

fn random_title<R: Rng + ?Sized>(rng: &mut R) -> String {
    match rng.gen_range(1..=10) {
        1..=7 => format!(
            "{} {} {}",
            pick(rng, TITLE_PREFIXES),
            pick(rng, TITLE_NOUNS),
            pick(rng, TITLE_SUFFIXES)
        ),
        8 | 9 => format!("{} {}", pick(rng, TITLE_PREFIXES), pick(rng, TITLE_NOUNS)),
        _ => format!("{} {}", pick(rng, TITLE_NOUNS), pick(rng, TITLE_SUFFIXES)),
    }
}

/// A date within the last 200 years, never after `today`.
fn random_date<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    let year = rng.gen_range(today.year() - 200..=today.year());
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day)
        .filter(|date| *date <= today)
        .unwrap_or_else(|| today - Duration::days(rng.gen_range(0..365)))
}

/// Hyphenated ISBN-13 with the `978` prefix and a correct check digit.
fn random_isbn13<R: Rng + ?Sized>(rng: &mut R) -> String {
    let group = match rng.gen_range(0..=7u8) {
        6 => 0,
        g => g,
    }
    .to_string();
    let publisher: String = (0..rng.gen_range(2..=6))
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    let title: String = (0..9 - group.len() - publisher.len())
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();

    let digits = format!("978{group}{publisher}{title}");
    format!("978-{group}-{publisher}-{title}-{}", isbn13_check_digit(&digits))
}

/// Check digit for the first twelve digits of an ISBN-13.
fn isbn13_check_digit(first_twelve: &str) -> u32 {
    let sum: u32 = first_twelve
        .chars()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d } else { d * 3 })
        .sum();
    (10 - sum % 10) % 10
}
