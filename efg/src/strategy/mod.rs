mod behavior_profile;

pub use behavior_profile::BehaviorProfile;
