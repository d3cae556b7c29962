//! Pose landmarks as delivered by the estimation collaborator
//!
//! Two wire shapes are accepted:
//! - MediaPipe Pose: an array of 33 `{x, y, z, visibility}` entries, indexed
//! - keypoint map: `{"left_hip": {"x": .., "y": .., "score": ..}, ...}`
//!
//! Coordinates are normalized image coordinates, y grows downward.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One estimated landmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Detection confidence; MoveNet calls it `score`
    #[serde(default, alias = "score", skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None, visibility: None }
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Finite coordinates and, when reported, visibility at or above `min`
    pub fn is_usable(&self, min_visibility: f64) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.visibility.map_or(true, |v| v >= min_visibility)
    }

    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Joints the coach looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    pub const ALL: [Joint; 9] = [
        Joint::Nose,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    /// Index in the MediaPipe Pose landmark list
    pub fn mediapipe_index(&self) -> usize {
        match self {
            Joint::Nose => 0,
            Joint::LeftShoulder => 11,
            Joint::RightShoulder => 12,
            Joint::LeftHip => 23,
            Joint::RightHip => 24,
            Joint::LeftKnee => 25,
            Joint::RightKnee => 26,
            Joint::LeftAnkle => 27,
            Joint::RightAnkle => 28,
        }
    }

    /// COCO / MoveNet keypoint name
    pub fn keypoint_name(&self) -> &'static str {
        match self {
            Joint::Nose => "nose",
            Joint::LeftShoulder => "left_shoulder",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftHip => "left_hip",
            Joint::RightHip => "right_hip",
            Joint::LeftKnee => "left_knee",
            Joint::RightKnee => "right_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightAnkle => "right_ankle",
        }
    }

    /// Parse a keypoint name. Side-less names ("hip", "knee") mean the left side.
    pub fn from_name(name: &str) -> Option<Joint> {
        let joint = match name.to_ascii_lowercase().as_str() {
            "nose" => Joint::Nose,
            "left_shoulder" | "shoulder" => Joint::LeftShoulder,
            "right_shoulder" => Joint::RightShoulder,
            "left_hip" | "hip" => Joint::LeftHip,
            "right_hip" => Joint::RightHip,
            "left_knee" | "knee" => Joint::LeftKnee,
            "right_knee" => Joint::RightKnee,
            "left_ankle" | "ankle" => Joint::LeftAnkle,
            "right_ankle" => Joint::RightAnkle,
            _ => return None,
        };
        Some(joint)
    }
}

/// The usable joints of one estimated pose
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    joints: BTreeMap<Joint, Landmark>,
}

impl PoseFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a MediaPipe-indexed list; short lists simply lack joints
    pub fn from_indexed(landmarks: &[Option<Landmark>], min_visibility: f64) -> Self {
        let mut frame = Self::new();
        for joint in Joint::ALL {
            if let Some(Some(lm)) = landmarks.get(joint.mediapipe_index()) {
                frame.insert_if_usable(joint, *lm, min_visibility);
            }
        }
        frame
    }

    /// Build from named keypoints; unknown names are ignored
    pub fn from_named(keypoints: &HashMap<String, Landmark>, min_visibility: f64) -> Self {
        let mut frame = Self::new();
        for (name, lm) in keypoints {
            if let Some(joint) = Joint::from_name(name) {
                // explicit sided names win over side-less aliases
                if frame.joints.contains_key(&joint) && !name.contains('_') {
                    continue;
                }
                frame.insert_if_usable(joint, *lm, min_visibility);
            }
        }
        frame
    }

    pub fn with_joint(mut self, joint: Joint, landmark: Landmark) -> Self {
        self.joints.insert(joint, landmark);
        self
    }

    fn insert_if_usable(&mut self, joint: Joint, landmark: Landmark, min_visibility: f64) {
        if landmark.is_usable(min_visibility) {
            self.joints.insert(joint, landmark);
        }
    }

    pub fn get(&self, joint: Joint) -> Option<&Landmark> {
        self.joints.get(&joint)
    }
}

/// JSON body for a frame, in either supported shape
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FrameInput {
    Indexed(Vec<Option<Landmark>>),
    Named(HashMap<String, Landmark>),
}

impl FrameInput {
    pub fn into_frame(self, min_visibility: f64) -> PoseFrame {
        match self {
            FrameInput::Indexed(list) => PoseFrame::from_indexed(&list, min_visibility),
            FrameInput::Named(map) => PoseFrame::from_named(&map, min_visibility),
        }
    }
}
