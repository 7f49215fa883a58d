use crate::domain::{
    models::{PauseInterval, PauseList},
    DateFormatter, TimeTrackingError,
};

/// Turn the form's hour/minute pauses into absolute intervals on `date`,
/// each paired with the pause's index in the list.
///
/// Overlaps, ordering and containment in the entry are checked by the write
/// service, not here.
pub fn build_pause_intervals(
    formatter: &dyn DateFormatter,
    date: &str,
    pauses: &PauseList,
) -> Result<Vec<(usize, PauseInterval)>, TimeTrackingError> {
    pauses
        .iter()
        .map(|(index, pause)| -> Result<(usize, PauseInterval), TimeTrackingError> {
            let interval = PauseInterval::new(
                formatter.compose_timestamp(date, pause.start()?)?,
                formatter.compose_timestamp(date, pause.end()?)?,
            );
            Ok((index, interval))
        })
        .collect()
}
