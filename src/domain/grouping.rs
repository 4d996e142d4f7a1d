use std::collections::HashMap;

use super::Row;

/// Rows sharing one identifier, in parse order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group<'a> {
    pub id: String,
    pub representative: &'a Row,
    pub members: Vec<&'a Row>,
}

impl<'a> Group<'a> {
    fn new(id: String, first: &'a Row) -> Self {
        Group {
            id,
            representative: first,
            members: vec![first],
        }
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }
}

/// Partitions `rows` by the `key` column. Group order follows the first
/// appearance of each key; members keep their relative order.
pub fn group_rows<'a>(rows: impl IntoIterator<Item = &'a Row>, key: &str) -> Vec<Group<'a>> {
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut index_by_id: HashMap<&'a str, usize> = HashMap::new();

    for row in rows {
        let id = row.get(key);
        match index_by_id.get(id) {
            Some(&idx) => groups[idx].members.push(row),
            None => {
                index_by_id.insert(id, groups.len());
                groups.push(Group::new(id.to_string(), row));
            }
        }
    }

    groups
}
