use crate::models::Table;
use crate::models::device::DeviceTable;
use crate::models::integration_event::IntegrationEventTable;
use crate::models::telemetry_record::TelemetryRecordTable;

pub struct SchemaManager {
    tables: Vec<Box<dyn Table>>,
}

impl SchemaManager {
    pub fn new(mut tables: Vec<Box<dyn Table>>) -> Self {
        Self::sort_tables(&mut tables);
        Self { tables }
    }

    // Topological order: a table is created only after its dependencies.
    fn sort_tables(tables: &mut Vec<Box<dyn Table>>) {
        let mut remaining = std::mem::take(tables);
        let mut sorted: Vec<Box<dyn Table>> = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let resolved: Vec<usize> = remaining
                .iter()
                .enumerate()
                .filter(|(_, table)| {
                    table
                        .dependencies()
                        .iter()
                        .all(|dep| sorted.iter().any(|done| done.name() == *dep))
                })
                .map(|(index, _)| index)
                .collect();

            assert!(
                !resolved.is_empty(),
                "Circular dependency detected or unresolved dependencies exist."
            );

            for &index in resolved.iter().rev() {
                sorted.push(remaining.swap_remove(index));
            }
        }

        *tables = sorted;
    }

    pub fn create_schema(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.create()).collect()
    }

    pub fn dispose_schema(&self) -> Vec<String> {
        self.tables.iter().rev().map(|table| table.dispose()).collect()
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        SchemaManager::new(vec![
            Box::new(TelemetryRecordTable),
            Box::new(IntegrationEventTable),
            Box::new(DeviceTable),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(order: &[String], fragment: &str) -> usize {
        order
            .iter()
            .position(|statement| statement.contains(fragment))
            .unwrap_or_else(|| panic!("no statement mentions {fragment}"))
    }

    #[test]
    fn devices_created_before_dependent_tables() {
        let schema = SchemaManager::default();
        let create = schema.create_schema();

        let devices = position(&create, "CREATE TABLE IF NOT EXISTS devices");
        let telemetry = position(&create, "CREATE TABLE IF NOT EXISTS telemetry_records");
        let events = position(&create, "CREATE TABLE IF NOT EXISTS integration_events");

        assert!(devices < telemetry);
        assert!(devices < events);
    }

    #[test]
    fn dispose_reverses_creation_order() {
        let schema = SchemaManager::default();
        let dispose = schema.dispose_schema();

        let devices = position(&dispose, "DROP TABLE IF EXISTS devices");
        let telemetry = position(&dispose, "DROP TABLE IF EXISTS telemetry_records");

        assert!(telemetry < devices);
    }
}
