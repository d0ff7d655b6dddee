mod proofs;
mod records;

pub use proofs::ProofStorage;
pub use records::RecordStore;
