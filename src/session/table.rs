//! CSV export of the placed roster.

use std::collections::HashMap;
use std::io::Write;

use crate::grouping::Group;
use crate::roster::{Criterion, IndividualId, Roster};

/// Group column value for individuals outside every group.
pub const UNASSIGNED: &str = "Unassigned";

const FIXED_COLUMNS: [&str; 7] = [
    "Group Name",
    "First Name",
    "Last Name",
    "Gender",
    "Tags",
    "Notes",
    "Previous Teacher",
];

/// Writes one row per individual, ordered by group name.
///
/// Rows of the same group keep roster order. Criterion columns follow the
/// fixed columns and hold raw values, with unreadable ones written as 0.
/// The output reads back through [`RecordImporter`](crate::roster::RecordImporter).
pub fn write_roster_csv<W: Write>(
    writer: W,
    roster: &Roster,
    criteria: &[Criterion],
    groups: &[Group],
) -> Result<(), csv::Error> {
    let group_of: HashMap<&IndividualId, &str> = groups
        .iter()
        .flat_map(|g| g.members.iter().map(move |id| (id, g.name.as_str())))
        .collect();

    let mut rows: Vec<Vec<String>> = roster
        .iter()
        .map(|ind| {
            let group = group_of.get(&ind.id).copied().unwrap_or(UNASSIGNED);
            let mut row = vec![
                group.to_string(),
                ind.first_name.clone(),
                ind.last_name.clone(),
                ind.gender.map(|g| g.code().to_string()).unwrap_or_default(),
                ind.tags.join("; "),
                ind.notes.replace(['\r', '\n'], " "),
                ind.previous_group.clone(),
            ];
            row.extend(criteria.iter().map(|c| ind.raw_score(&c.label).to_string()));
            row
        })
        .collect();
    rows.sort_by(|a, b| a[0].cmp(&b[0]));

    let mut out = csv::Writer::from_writer(writer);
    out.write_record(
        FIXED_COLUMNS
            .iter()
            .copied()
            .chain(criteria.iter().map(|c| c.label.as_str())),
    )?;
    for row in &rows {
        out.write_record(row)?;
    }
    out.flush()?;
    tracing::debug!(event = "roster_exported", rows = rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Gender, Individual, RecordImporter};

    fn group(name: &str, members: &[&str]) -> Group {
        let mut g = Group::new(0, name, members.len());
        g.members = members.iter().map(|m| m.to_string()).collect();
        g
    }

    fn export(roster: &Roster, criteria: &[Criterion], groups: &[Group]) -> String {
        let mut buf = Vec::new();
        write_roster_csv(&mut buf, roster, criteria, groups).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_rows_sorted_by_group_name() {
        let roster = Roster::from_individuals(vec![
            Individual::new("a", "Ann", "Lee").with_score("Reading", 80.0),
            Individual::new("b", "Bo", "Kim").with_score("Reading", 40.5),
            Individual::new("c", "Cy", "Park"),
            Individual::new("d", "Di", "Ng").with_gender(Gender::Female),
        ]);
        let criteria = vec![Criterion::new("Reading")];
        let groups = vec![group("Willow", &["a", "d"]), group("Oak", &["b"])];

        let text = export(&roster, &criteria, &groups);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Group Name,First Name,Last Name,Gender,Tags,Notes,Previous Teacher,Reading",
                "Oak,Bo,Kim,,,,,40.5",
                "Unassigned,Cy,Park,,,,,0",
                "Willow,Ann,Lee,,,,,80",
                "Willow,Di,Ng,F,,,,0",
            ]
        );
    }

    #[test]
    fn test_quoting_and_reimport() {
        let mut ann = Individual::new("a", "Ann", "Lee").with_score("Reading", 72.0);
        ann.tags = vec!["art".into(), "music".into()];
        ann.notes = "reads, writes\nwell".into();
        ann.previous_group = "Room 4".into();
        let roster = Roster::from_individuals(vec![ann]);
        let criteria = vec![Criterion::new("Reading")];

        let text = export(&roster, &criteria, &[group("Oak", &["a"])]);
        assert!(text.contains("\"reads, writes well\""));

        let back = RecordImporter::default()
            .import_reader(text.as_bytes())
            .unwrap();
        let ann = back.roster.get("annlee").unwrap();
        assert_eq!(ann.notes, "reads, writes well");
        assert_eq!(ann.tags, vec!["art", "music"]);
        assert_eq!(ann.previous_group, "Room 4");
        assert!((ann.raw_score("Reading") - 72.0).abs() < 1e-10);
        assert_eq!(back.criteria.len(), 1);
    }
}
