// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::model::*;
    use std::path::PathBuf;

    fn artifact(source: ArtifactSource, path: &str) -> NormalizedArtifact {
        NormalizedArtifact {
            source,
            scratch_path: PathBuf::from(path),
        }
    }

    fn clip_artifact(position: usize, path: &str) -> NormalizedArtifact {
        artifact(
            ArtifactSource::Clip {
                position,
                descriptor: ClipDescriptor::new(format!("src/{}.mp4", position), 10.0),
            },
            path,
        )
    }

    #[test]
    fn test_clip_descriptor_eligibility() {
        assert!(ClipDescriptor::new("a.mp4", 12.5).is_eligible());
        assert!(!ClipDescriptor::new("", 12.5).is_eligible());
        assert!(!ClipDescriptor::new("a.mp4", 0.0).is_eligible());
        assert!(!ClipDescriptor::new("a.mp4", -3.0).is_eligible());
    }

    #[test]
    fn test_clip_descriptor_title() {
        let clip = ClipDescriptor::new("a.mp4", 1.0).with_title("Big play");
        assert_eq!(clip.display_title.as_deref(), Some("Big play"));
    }

    #[test]
    fn test_artifact_source_labels() {
        assert_eq!(ArtifactSource::Intro.label(), "intro");
        assert_eq!(ArtifactSource::Outro.label(), "outro");
        let clip = ArtifactSource::Clip {
            position: 4,
            descriptor: ClipDescriptor::new("a.mp4", 1.0),
        };
        assert_eq!(clip.label(), "clip 4");
        assert!(!clip.is_bookend());
        assert!(ArtifactSource::Intro.is_bookend());
    }

    #[test]
    fn test_normalized_set_from_ordered() {
        let set = NormalizedSet::from_ordered(vec![
            artifact(ArtifactSource::Intro, "/ws/000_intro.mp4"),
            clip_artifact(1, "/ws/001_a.mp4"),
            clip_artifact(2, "/ws/002_b.mp4"),
            artifact(ArtifactSource::Outro, "/ws/003_outro.mp4"),
        ])
        .unwrap();
        assert_eq!(set.clips.len(), 2);
        assert_eq!(set.intro.scratch_path, PathBuf::from("/ws/000_intro.mp4"));
        assert_eq!(set.outro.scratch_path, PathBuf::from("/ws/003_outro.mp4"));
    }

    #[test]
    fn test_normalized_set_rejects_misplaced_bookends() {
        let swapped = NormalizedSet::from_ordered(vec![
            artifact(ArtifactSource::Outro, "/ws/o.mp4"),
            artifact(ArtifactSource::Intro, "/ws/i.mp4"),
        ]);
        assert!(swapped.is_none());

        let bookend_inside = NormalizedSet::from_ordered(vec![
            artifact(ArtifactSource::Intro, "/ws/i.mp4"),
            artifact(ArtifactSource::Intro, "/ws/i2.mp4"),
            artifact(ArtifactSource::Outro, "/ws/o.mp4"),
        ]);
        assert!(bookend_inside.is_none());

        assert!(NormalizedSet::from_ordered(vec![]).is_none());
    }

    #[test]
    fn test_sequence_order_and_length() {
        let set = NormalizedSet::from_ordered(vec![
            artifact(ArtifactSource::Intro, "/ws/000_intro.mp4"),
            clip_artifact(1, "/ws/001_a.mp4"),
            clip_artifact(2, "/ws/002_b.mp4"),
            clip_artifact(3, "/ws/003_c.mp4"),
            artifact(ArtifactSource::Outro, "/ws/004_outro.mp4"),
        ])
        .unwrap();
        let sequence = Sequence::from_set(&set);

        assert_eq!(sequence.len(), 5);
        assert_eq!(sequence.clip_count(), 3);
        let names: Vec<String> = sequence
            .entries()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["000_intro.mp4", "001_a.mp4", "002_b.mp4", "003_c.mp4", "004_outro.mp4"]
        );
    }

    #[test]
    fn test_sequence_with_only_bookends() {
        let set = NormalizedSet::from_ordered(vec![
            artifact(ArtifactSource::Intro, "/ws/000_intro.mp4"),
            artifact(ArtifactSource::Outro, "/ws/001_outro.mp4"),
        ])
        .unwrap();
        let sequence = Sequence::from_set(&set);
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.clip_count(), 0);
    }

    #[test]
    fn test_pipeline_state_display() {
        assert_eq!(PipelineState::Normalizing.to_string(), "normalizing");
        assert_eq!(
            PipelineState::Failed("boom".to_string()).to_string(),
            "failed: boom"
        );
        assert!(PipelineState::Done.is_terminal());
        assert!(!PipelineState::Sequencing.is_terminal());
    }

    #[test]
    fn test_noop_reason_display() {
        assert_eq!(NoOpReason::ManifestEmpty.to_string(), "manifest has no clips");
        assert_eq!(
            NoOpReason::NoValidClips { rejected: 2 }.to_string(),
            "no valid clips (2 rejected)"
        );
    }
}
