/// Which program, and which member row inside it, is expanded.
///
/// The enum makes "at most one program and one member" structural: there is
/// no way to represent two open programs or a member without its program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionState {
    #[default]
    Collapsed,
    ProgramExpanded(i64),
    ProgramAndStudentExpanded(i64, i64),
}

impl ExpansionState {
    pub fn expanded_program(&self) -> Option<i64> {
        match *self {
            ExpansionState::Collapsed => None,
            ExpansionState::ProgramExpanded(p) => Some(p),
            ExpansionState::ProgramAndStudentExpanded(p, _) => Some(p),
        }
    }

    pub fn expanded_student(&self) -> Option<i64> {
        match *self {
            ExpansionState::ProgramAndStudentExpanded(_, s) => Some(s),
            _ => None,
        }
    }

    pub fn is_program_expanded(&self, program_id: i64) -> bool {
        self.expanded_program() == Some(program_id)
    }

    pub fn is_student_expanded(&self, student_id: i64) -> bool {
        self.expanded_student() == Some(student_id)
    }

    /// Open `program_id`, or close it if it is already open.
    /// The student selection never survives this call.
    pub fn toggle_program(&mut self, program_id: i64) {
        *self = if self.is_program_expanded(program_id) {
            ExpansionState::Collapsed
        } else {
            ExpansionState::ProgramExpanded(program_id)
        };
    }

    /// Open `student_id` inside the open program, or close it if already open.
    /// Ignored while no program is open.
    pub fn toggle_student(&mut self, student_id: i64) {
        *self = match *self {
            ExpansionState::Collapsed => ExpansionState::Collapsed,
            ExpansionState::ProgramAndStudentExpanded(p, s) if s == student_id => {
                ExpansionState::ProgramExpanded(p)
            }
            ExpansionState::ProgramExpanded(p) | ExpansionState::ProgramAndStudentExpanded(p, _) => {
                ExpansionState::ProgramAndStudentExpanded(p, student_id)
            }
        };
    }

    pub fn collapse(&mut self) {
        *self = ExpansionState::Collapsed;
    }
}
