pub mod firestore;
pub mod mongo;

pub use firestore::FirestoreClient;
pub use mongo::Database;
