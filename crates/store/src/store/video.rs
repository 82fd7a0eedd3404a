use horizon_primitives::{HighlightKind, HighlightRecord, VideoData};

use super::HighlightStore;
use crate::patch::VideoPatch;

impl HighlightStore {
	/// Stores a video segment as a record of kind `video`.
	pub async fn save_video_highlight(&self, url: &str, data: VideoData) -> Option<HighlightRecord> {
		let id = self.generate_id(HighlightKind::Video);
		let record = HighlightRecord::video(id, url, data, self.now());
		self.create(record).await
	}

	/// Video records of `video_id`, ordered by segment start.
	pub async fn video_highlights(&self, video_id: &str) -> Vec<HighlightRecord> {
		let mut out = self
			.filtered("video_highlights", |record| {
				record.is_video() && record.video_data.as_ref().is_some_and(|data| data.video_id == video_id)
			})
			.await;
		out.sort_by(|a, b| {
			let start = |r: &HighlightRecord| r.video_data.as_ref().map_or(0.0, |d| d.start_time);
			start(a).total_cmp(&start(b))
		});
		out
	}

	/// Merges `patch` into a video record. Text records are rejected.
	pub async fn update_video_highlight(&self, id: &str, patch: VideoPatch) -> bool {
		let result = self
			.mutate("update_video", |collection, now| {
				let record = collection.find_mut(id)?;
				if !record.is_video() {
					tracing::debug!(id, "store.update_video.not_video");
					return None;
				}
				let data = record.video_data.as_mut()?;
				patch.apply(data);
				record.title = data.title.clone();
				record.updated_at = Some(now);
				Some(())
			})
			.await;
		self.report("update_video", id, result)
	}
}
