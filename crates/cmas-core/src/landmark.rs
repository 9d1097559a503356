use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// Canonical 33-point body model. Index meaning is fixed system-wide.
pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;
pub const LEFT_HEEL: usize = 29;
pub const RIGHT_HEEL: usize = 30;
pub const LEFT_FOOT_INDEX: usize = 31;
pub const RIGHT_FOOT_INDEX: usize = 32;

/// Number of keypoints in a full-body frame.
pub const FULL_BODY: usize = 33;

/// One tracked body keypoint in image-relative coordinates.
///
/// `y` grows downwards, so "higher on screen" means a smaller `y`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }
}

/// The complete landmark set for one sampled instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame {
    landmarks: Vec<Landmark>,
}

impl Frame {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Whether this frame carries at least `min_len` landmarks.
    pub fn covers(&self, min_len: usize) -> bool {
        self.landmarks.len() >= min_len
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Mean `x` of two landmarks.
    pub fn mid_x(&self, a: usize, b: usize) -> f64 {
        (self[a].x + self[b].x) / 2.0
    }

    /// Mean `y` of two landmarks.
    pub fn mid_y(&self, a: usize, b: usize) -> f64 {
        (self[a].y + self[b].y) / 2.0
    }
}

impl Index<usize> for Frame {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        &self.landmarks[index]
    }
}

impl FromIterator<Landmark> for Frame {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Wire shape of one landmark-service response.
///
/// The service publishes its list under `cmas`; `landmarks` is accepted as
/// well. Any other fields in the body are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandmarkPayload {
    #[serde(default, alias = "cmas")]
    pub landmarks: Vec<Landmark>,
}

impl LandmarkPayload {
    pub fn parse(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert to a frame, or `None` when the service had no pose to report.
    pub fn into_frame(self) -> Option<Frame> {
        if self.landmarks.is_empty() {
            None
        } else {
            Some(Frame::new(self.landmarks))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_payload_with_extra_fields() {
        let json = r#"{
            "cmas": [
                {"id": 0, "x": 0.5, "y": 0.25, "z": -0.1, "visibility": 0.99},
                {"id": 1, "x": 0.4, "y": 0.3, "z": 0.0, "visibility": 0.9}
            ],
            "legs": {"left_leg": {}, "right_leg": {}},
            "feet": {}
        }"#;

        let frame = LandmarkPayload::parse(json).unwrap().into_frame().unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame[0].y, 0.25);
        assert_eq!(frame[0].z, Some(-0.1));
    }

    #[test]
    fn accepts_landmarks_key() {
        let json = r#"{"landmarks": [{"x": 0.1, "y": 0.2}]}"#;
        let frame = LandmarkPayload::parse(json).unwrap().into_frame().unwrap();
        assert_eq!(frame[0], Landmark::new(0.1, 0.2));
    }

    #[test]
    fn empty_payload_is_absent() {
        assert!(LandmarkPayload::parse("{}").unwrap().into_frame().is_none());
        assert!(
            LandmarkPayload::parse(r#"{"cmas": []}"#)
                .unwrap()
                .into_frame()
                .is_none()
        );
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(LandmarkPayload::parse("not json").is_err());
        assert!(LandmarkPayload::parse(r#"{"cmas": [{"x": "left"}]}"#).is_err());
    }

    #[test]
    fn covers_checks_minimum_length() {
        let frame: Frame = (0..25).map(|_| Landmark::default()).collect();
        assert!(frame.covers(25));
        assert!(!frame.covers(FULL_BODY));
    }
}
