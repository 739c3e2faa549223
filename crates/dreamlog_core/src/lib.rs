pub mod comments;
pub mod domain;
pub mod error;
pub mod memory;
pub mod ports;
pub mod validate;

pub use domain::{
    Comment, CommentDraft, CommentPatch, Dream, DreamDraft, DreamPatch, DreamType, DreamTypeDraft,
    NewComment, NewDream, NewDreamType, NewReaction, NewTopic, NewUser, Reaction, ReactionDraft,
    ReactionPatch, RefreshToken, RefreshTokenDraft, Topic, TopicDraft, User, UserCredentials,
    UserDraft, UserPatch,
};
pub use error::{Entity, Error, Violation, ViolationKind};
pub use memory::MemoryStore;
pub use ports::{JournalStore, StoreError, StoreResult};
