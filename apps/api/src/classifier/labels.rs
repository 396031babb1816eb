use std::borrow::Cow;

use serde::Serialize;

/// Integer label → display name for every category the screening model was trained on.
pub const CATEGORY_TABLE: [(i64, &str); 25] = [
    (0, "Advocate"),
    (1, "Arts"),
    (2, "Automation Testing"),
    (3, "Blockchain"),
    (4, "Business Analyst"),
    (5, "Civil Engineer"),
    (6, "Data Science"),
    (7, "Database"),
    (8, "DevOps Engineer"),
    (9, "DotNet Developer"),
    (10, "ETL Developer"),
    (11, "Electrical Engineering"),
    (12, "HR"),
    (13, "Hadoop"),
    (14, "Health and fitness"),
    (15, "Java Developer"),
    (16, "Mechanical Engineer"),
    (17, "Network Security Engineer"),
    (18, "Operations Manager"),
    (19, "PMO"),
    (20, "Python Developer"),
    (21, "SAP Developer"),
    (22, "Sales"),
    (23, "Testing"),
    (24, "Web Designing"),
];

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub label: i64,
    pub name: &'static str,
}

/// Maps a predicted label to its category name.
/// Labels outside the table fall back to the number itself.
pub fn map_label(label: i64) -> Cow<'static, str> {
    CATEGORY_TABLE
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, name)| Cow::Borrowed(*name))
        .unwrap_or_else(|| Cow::Owned(label.to_string()))
}

/// Returns the classifier labels that have no entry in `CATEGORY_TABLE`.
pub fn unmapped_labels(classes: &[i64]) -> Vec<i64> {
    let mut missing: Vec<i64> = classes
        .iter()
        .copied()
        .filter(|c| !CATEGORY_TABLE.iter().any(|(l, _)| l == c))
        .collect();
    missing.sort_unstable();
    missing.dedup();
    missing
}

pub fn categories() -> Vec<Category> {
    CATEGORY_TABLE
        .iter()
        .map(|&(label, name)| Category { label, name })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_label_data_science() {
        assert_eq!(map_label(6), "Data Science");
    }

    #[test]
    fn test_map_label_bounds() {
        assert_eq!(map_label(0), "Advocate");
        assert_eq!(map_label(24), "Web Designing");
    }

    #[test]
    fn test_map_label_unknown_falls_back_to_number() {
        assert_eq!(map_label(999), "999");
        assert_eq!(map_label(-3), "-3");
    }

    #[test]
    fn test_table_is_dense_and_ordered() {
        for (i, (label, _)) in CATEGORY_TABLE.iter().enumerate() {
            assert_eq!(*label, i as i64);
        }
    }

    #[test]
    fn test_unmapped_labels() {
        assert!(unmapped_labels(&[0, 6, 24]).is_empty());
        assert_eq!(unmapped_labels(&[31, 6, 25, 31]), vec![25, 31]);
    }

    #[test]
    fn test_categories_listing() {
        let all = categories();
        assert_eq!(all.len(), 25);
        assert_eq!(all[15].name, "Java Developer");
    }
}
