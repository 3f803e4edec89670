use credval_core::{query, InstitutionStatistics, NewStudent, StudentRecord, ValidationError};

/// Graduation year from which a student counts as a recent graduate.
pub const RECENT_GRADUATE_YEAR: i32 = 2024;

/// One institution's student table. The orchestrator only ever searches
/// through this trait, in registration order.
pub trait RecordStore: Send + Sync {
    fn name(&self) -> &str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point lookup by student id. A miss is `None`, never an error.
    fn lookup(&self, student_id: &str) -> Option<StudentRecord>;

    /// Snapshot of all records in insertion order.
    fn records(&self) -> Vec<StudentRecord>;

    fn add(&self, student: NewStudent) -> Result<StudentRecord, ValidationError>;

    /// All-or-nothing: every entry is checked before any is inserted.
    fn add_bulk(&self, students: Vec<NewStudent>) -> Result<usize, ValidationError>;

    fn search_by_name(&self, query: &str, exact: bool) -> Vec<StudentRecord> {
        query::search_by_name(&self.records(), query, exact)
    }

    fn search_by_degree(&self, query: &str) -> Vec<StudentRecord> {
        query::search_by_degree(&self.records(), query)
    }

    fn range_by_cgpa(&self, min: f64, max: f64) -> Vec<StudentRecord> {
        query::range_by_cgpa(&self.records(), min, max)
    }

    fn top_n(&self, n: usize) -> Vec<StudentRecord> {
        query::top_n(&self.records(), n)
    }

    fn recent_graduates(&self, since_year: i32) -> Vec<StudentRecord> {
        query::recent_graduates(&self.records(), since_year)
    }

    fn statistics(&self) -> InstitutionStatistics {
        self.statistics_since(RECENT_GRADUATE_YEAR)
    }

    fn statistics_since(&self, recent_year: i32) -> InstitutionStatistics {
        query::statistics(&self.records(), recent_year)
    }

    fn degree_distribution(&self) -> Vec<(String, usize)> {
        query::degree_distribution(&self.records())
    }

    fn graduation_year_distribution(&self) -> Vec<(i32, usize)> {
        query::graduation_year_distribution(&self.records())
    }
}
