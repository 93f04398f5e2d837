// Application layer - Use case interactors

pub mod captions_interactor;
pub mod container;
pub mod pipeline_interactor;
pub mod story_interactor;

// Re-export interactors
pub use captions_interactor::{CaptionsInteractor, CaptionsRequest, CaptionsResponse};
pub use container::AppContainer;
pub use pipeline_interactor::{PipelineInteractor, VoiceBackend};
pub use story_interactor::StoryInteractor;
