use circle_gesture::{GestureRecognizer, GestureUpdate, RecognizerState, TouchSample};

#[derive(Clone, Copy, Debug)]
pub struct ReplayRow {
    pub sample: TouchSample,
    pub update: GestureUpdate,
}

pub fn replay(recognizer: &mut impl GestureRecognizer, samples: &[TouchSample]) -> Vec<ReplayRow> {
    samples
        .iter()
        .map(|&sample| ReplayRow {
            sample,
            update: recognizer.handle(sample),
        })
        .collect()
}

/// Observable transitions in order, with runs of Changed collapsed to one.
pub fn transition_states(rows: &[ReplayRow]) -> Vec<RecognizerState> {
    let mut states: Vec<RecognizerState> = Vec::new();
    for row in rows.iter().filter(|row| row.update.is_transition()) {
        if states.last() == Some(&row.update.state) {
            continue;
        }
        states.push(row.update.state);
    }
    states
}
