use std::collections::HashMap;

use tracing::debug;

use crate::models::{Program, Submission};

/// A program together with the submissions made to it.
/// Rebuilt from scratch on every fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedProgram {
    pub program: Program,
    pub submissions: Vec<Submission>,
}

/// Group items by the program they reference.
///
/// Programs appear in the order they are first seen and each keeps its items
/// in input order. Program fields come from the first item referencing that
/// id. Items without a program are dropped.
pub fn group_by_program<T, F>(items: Vec<T>, program_of: F) -> Vec<(Program, Vec<T>)>
where
    F: Fn(&T) -> Option<&Program>,
{
    let mut groups: Vec<(Program, Vec<T>)> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut skipped = 0usize;

    for item in items {
        let slot = match program_of(&item) {
            Some(program) => match index.get(&program.id) {
                Some(&slot) => slot,
                None => {
                    groups.push((program.clone(), Vec::new()));
                    index.insert(program.id, groups.len() - 1);
                    groups.len() - 1
                }
            },
            None => {
                skipped += 1;
                continue;
            }
        };
        groups[slot].1.push(item);
    }

    if skipped > 0 {
        debug!(skipped, "Skipped items without a program reference");
    }
    groups
}

/// Group submissions by `application.program`.
/// Duplicate submission ids are kept as separate entries.
pub fn group_submissions(submissions: Vec<Submission>) -> Vec<GroupedProgram> {
    group_by_program(submissions, Submission::program)
        .into_iter()
        .map(|(program, submissions)| GroupedProgram {
            program,
            submissions,
        })
        .collect()
}

/// Flatten grouped programs back into a submission list, program by program.
pub fn flatten(groups: &[GroupedProgram]) -> Vec<Submission> {
    groups
        .iter()
        .flat_map(|g| g.submissions.iter().cloned())
        .collect()
}
