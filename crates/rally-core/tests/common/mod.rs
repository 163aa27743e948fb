use jiff::civil::date;
use rally_core::{Planner, PlannerBuilder};
use tempfile::TempDir;

/// Helper function to create a test planner proposing dates from Monday
/// 2024-06-03.
pub async fn create_test_planner() -> (TempDir, Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_fixed_date(date(2024, 6, 3))
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}
