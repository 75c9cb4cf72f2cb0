//! Repositories, one per aggregate. Every operation takes its executor
//! (`&PgPool` or `&mut PgConnection` inside a transaction) as the first argument.

pub mod song_repo;

pub use song_repo::SongRepo;
