/*!
 * Caption track selection.
 *
 * Picks exactly one track from a non-empty list:
 * 1. the first manual track for the earliest matching preferred language
 * 2. otherwise the first track of any kind for the earliest matching preference
 * 3. otherwise the first track overall
 */

use log::debug;

use crate::language_utils;
use crate::transcript::CaptionTrack;

/// Select a caption track by language preference
///
/// Returns `None` only when `tracks` is empty. The result depends only on
/// the inputs, so repeated calls with the same lists always agree.
pub fn select_track<'a, S: AsRef<str>>(
    tracks: &'a [CaptionTrack],
    preferences: &[S],
) -> Option<&'a CaptionTrack> {
    let first = tracks.first()?;

    for preferred in preferences {
        let preferred = preferred.as_ref();
        if let Some(track) = tracks
            .iter()
            .find(|t| !t.auto_generated && language_utils::preference_matches(preferred, &t.language_code))
        {
            debug!("Selected manual track {} for preference '{}'", track, preferred);
            return Some(track);
        }
    }

    for preferred in preferences {
        let preferred = preferred.as_ref();
        if let Some(track) = tracks
            .iter()
            .find(|t| language_utils::preference_matches(preferred, &t.language_code))
        {
            debug!("Selected track {} for preference '{}'", track, preferred);
            return Some(track);
        }
    }

    debug!("No track matches the preferred languages, falling back to {}", first);
    Some(first)
}
