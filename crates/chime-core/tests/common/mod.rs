use chime_core::{
    engine::SequentialIdGenerator, ChainShiftEngine, KvChainRepository, SqliteStore,
};
use jiff::tz::TimeZone;
use tempfile::NamedTempFile;

pub type SqliteEngine = ChainShiftEngine<KvChainRepository<SqliteStore>, SequentialIdGenerator>;

/// Engine over a temporary SQLite file with deterministic ids.
pub fn create_test_engine(time_zone: TimeZone) -> (NamedTempFile, SqliteEngine) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let store = SqliteStore::open(temp_file.path()).expect("Failed to open test store");
    let engine = ChainShiftEngine::new(
        KvChainRepository::new(store),
        SequentialIdGenerator::new(),
        time_zone,
    );
    (temp_file, engine)
}
