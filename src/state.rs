/// The state of one in-flight match attempt.
///
/// A state records how far the attempt has scanned and where each capture
/// group matched so far. Positions are relative to the offset at which the
/// attempt started, so the same state works unchanged over any
/// [`CharSource`](crate::source::CharSource).
///
/// States are plain values. Every place the matcher may need to backtrack
/// works on a clone, so a failed branch can never leave anything behind.
/// Several candidate states produced by the same step (for example, by a
/// repeated alternation) are kept in an ordinary `Vec<State>`.
///
/// For every group, the committed bounds are either both unset or
/// `start <= end`. The start of a group that is still open is kept in
/// `pending` and only committed together with its end.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct State {
    /// The current scan position.
    pub(crate) at: usize,
    starts: Vec<Option<usize>>,
    ends: Vec<Option<usize>>,
    pending: Vec<Option<usize>>,
}

impl State {
    /// Create a fresh state at position 0 for a program with `group_len`
    /// groups, including the implicit group 0.
    pub(crate) fn new(group_len: usize) -> State {
        State {
            at: 0,
            starts: vec![None; group_len],
            ends: vec![None; group_len],
            pending: vec![None; group_len],
        }
    }

    /// Marks the start of the given group at the current position.
    pub(crate) fn open(&mut self, group: usize) {
        self.pending[group] = Some(self.at);
    }

    /// Commits the bounds of the given group, ending at the current
    /// position.
    ///
    /// # Panics
    ///
    /// This panics if the group was never opened, which would mean the
    /// program is malformed.
    pub(crate) fn close(&mut self, group: usize) {
        let start = match self.pending[group] {
            Some(start) => start,
            None => panic!("group {} closed without being opened", group),
        };
        self.starts[group] = Some(start);
        self.ends[group] = Some(self.at);
    }

    /// Returns the committed bounds of the given group, if it participated
    /// in the match.
    pub(crate) fn group(&self, group: usize) -> Option<(usize, usize)> {
        match (self.starts[group], self.ends[group]) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Sets group 0 to span from position 0 to the current position.
    pub(crate) fn finish(&mut self) {
        self.starts[0] = Some(0);
        self.ends[0] = Some(self.at);
    }

    /// Returns the number of groups, including group 0.
    pub(crate) fn group_len(&self) -> usize {
        self.starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_commit_together() {
        let mut st = State::new(2);
        st.at = 3;
        st.open(1);
        assert_eq!(None, st.group(1));
        st.at = 5;
        st.close(1);
        assert_eq!(Some((3, 5)), st.group(1));
    }

    #[test]
    fn clones_are_independent() {
        let mut st = State::new(2);
        let snapshot = st.clone();
        st.open(1);
        st.at = 1;
        st.close(1);
        assert_ne!(snapshot, st);
        assert_eq!(None, snapshot.group(1));
    }

    #[test]
    #[should_panic]
    fn close_without_open() {
        State::new(2).close(1);
    }
}
