//! Player catalog model.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit JSON `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Store-assigned player identifier.
pub type PlayerId = u64;

/// Country a player represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Short country code (e.g., "FRA")
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,

    /// Flag picture reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

impl Country {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            picture: None,
        }
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }
}

/// Sporting data attached to a player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    /// ATP/WTA rank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,

    /// Ranking points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,

    /// Weight in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,

    /// Height in centimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    /// Recent match results, 1 = win and 0 = loss.
    /// Values are not validated on ingestion.
    #[serde(default, deserialize_with = "null_as_default")]
    pub last: Vec<i32>,
}

impl PlayerData {
    pub fn weight_in_kg(&self) -> f64 {
        self.weight.map(|w| w as f64 / 1000.0).unwrap_or(0.0)
    }

    pub fn height_in_meters(&self) -> f64 {
        self.height.map(|h| h as f64 / 100.0).unwrap_or(0.0)
    }

    /// Weight and height are both known and height is non-zero.
    pub fn has_valid_bmi_data(&self) -> bool {
        self.weight.is_some() && matches!(self.height, Some(h) if h > 0)
    }
}

/// A player in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Assigned by the store on first save, never changed afterwards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlayerId>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub firstname: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub lastname: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,

    /// Portrait picture reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PlayerData>,
}

impl Player {
    /// Create a new player without an id.
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            id: None,
            firstname: firstname.into(),
            lastname: lastname.into(),
            shortname: None,
            sex: None,
            country: None,
            picture: None,
            data: None,
        }
    }

    pub fn with_id(mut self, id: PlayerId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_shortname(mut self, shortname: impl Into<String>) -> Self {
        self.shortname = Some(shortname.into());
        self
    }

    pub fn with_sex(mut self, sex: impl Into<String>) -> Self {
        self.sex = Some(sex.into());
        self
    }

    pub fn with_country(mut self, country: Country) -> Self {
        self.country = Some(country);
        self
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    pub fn with_data(mut self, data: PlayerData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// Country is present and carries a non-empty code.
    pub fn has_valid_country(&self) -> bool {
        self.country.as_ref().is_some_and(|c| !c.code.is_empty())
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn has_valid_bmi_data(&self) -> bool {
        self.data.as_ref().is_some_and(PlayerData::has_valid_bmi_data)
    }

    /// Rank, if the player has data and a rank.
    pub fn rank(&self) -> Option<u32> {
        self.data.as_ref().and_then(|d| d.rank)
    }
}

/// Partial update for a player.
///
/// Every `Some` field overwrites the stored value; `None` leaves it untouched.
/// A patch can set fields but never clear them. `country` and `data` replace
/// the stored objects as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerPatch {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub shortname: Option<String>,
    pub sex: Option<String>,
    pub country: Option<Country>,
    pub picture: Option<String>,
    pub data: Option<PlayerData>,
}

impl PlayerPatch {
    /// Apply the patch in place. The player's id is never touched.
    pub fn apply_to(self, player: &mut Player) {
        if let Some(firstname) = self.firstname {
            player.firstname = firstname;
        }
        if let Some(lastname) = self.lastname {
            player.lastname = lastname;
        }
        if let Some(shortname) = self.shortname {
            player.shortname = Some(shortname);
        }
        if let Some(sex) = self.sex {
            player.sex = Some(sex);
        }
        if let Some(country) = self.country {
            player.country = Some(country);
        }
        if let Some(picture) = self.picture {
            player.picture = Some(picture);
        }
        if let Some(data) = self.data {
            player.data = Some(data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nadal() -> Player {
        Player::new("Rafael", "Nadal")
            .with_id(1)
            .with_shortname("R.NAD")
            .with_sex("M")
            .with_country(Country::new("ESP").with_picture("esp.png"))
            .with_data(PlayerData {
                rank: Some(1),
                points: Some(1982),
                weight: Some(85000),
                height: Some(185),
                age: Some(33),
                last: vec![1, 0, 0, 0, 1],
            })
    }

    #[test]
    fn test_full_name() {
        assert_eq!(nadal().full_name(), "Rafael Nadal");
    }

    #[test]
    fn test_has_valid_country() {
        assert!(nadal().has_valid_country());

        let no_country = Player::new("A", "B");
        assert!(!no_country.has_valid_country());

        let empty_code = Player::new("A", "B").with_country(Country::new(""));
        assert!(!empty_code.has_valid_country());
    }

    #[test]
    fn test_unit_conversions() {
        let data = nadal().data.unwrap();
        assert!((data.weight_in_kg() - 85.0).abs() < f64::EPSILON);
        assert!((data.height_in_meters() - 1.85).abs() < f64::EPSILON);

        let empty = PlayerData::default();
        assert_eq!(empty.weight_in_kg(), 0.0);
        assert_eq!(empty.height_in_meters(), 0.0);
    }

    #[test]
    fn test_has_valid_bmi_data() {
        assert!(nadal().has_valid_bmi_data());

        let zero_height = Player::new("A", "B").with_data(PlayerData {
            weight: Some(80000),
            height: Some(0),
            ..Default::default()
        });
        assert!(!zero_height.has_valid_bmi_data());

        let no_weight = Player::new("A", "B").with_data(PlayerData {
            height: Some(180),
            ..Default::default()
        });
        assert!(!no_weight.has_valid_bmi_data());
        assert!(!Player::new("A", "B").has_valid_bmi_data());
    }

    #[test]
    fn test_patch_only_firstname() {
        let mut player = nadal();
        let patch = PlayerPatch {
            firstname: Some("Rafa".to_string()),
            ..Default::default()
        };
        patch.apply_to(&mut player);

        let mut expected = nadal();
        expected.firstname = "Rafa".to_string();
        assert_eq!(player, expected);
    }

    #[test]
    fn test_patch_replaces_nested_objects_wholesale() {
        let mut player = nadal();
        let patch = PlayerPatch {
            country: Some(Country::new("FRA")),
            data: Some(PlayerData {
                rank: Some(4),
                ..Default::default()
            }),
            ..Default::default()
        };
        patch.apply_to(&mut player);

        assert_eq!(player.country, Some(Country::new("FRA")));
        let data = player.data.unwrap();
        assert_eq!(data.rank, Some(4));
        assert_eq!(data.height, None);
        assert!(data.last.is_empty());
    }

    #[test]
    fn test_empty_patch() {
        let mut player = nadal();
        PlayerPatch::default().apply_to(&mut player);
        assert_eq!(player, nadal());
    }

    #[test]
    fn test_player_deserialize_snapshot_record() {
        let json = r#"{
            "id": 52,
            "firstname": "Novak",
            "lastname": "Djokovic",
            "shortname": "N.DJO",
            "sex": "M",
            "country": {"picture": "srb.png", "code": "SRB"},
            "picture": "djokovic.png",
            "data": {"rank": 2, "points": 2542, "weight": 80000, "height": 188, "age": 31, "last": [1, 1, 1, 1, 1]}
        }"#;
        let player: Player = serde_json::from_str(json).unwrap();

        assert_eq!(player.id, Some(52));
        assert_eq!(player.country.as_ref().unwrap().code, "SRB");
        assert_eq!(player.rank(), Some(2));
        assert_eq!(player.data.unwrap().last, vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_player_deserialize_minimal() {
        let player: Player = serde_json::from_str(r#"{"firstname": "Serena"}"#).unwrap();
        assert_eq!(player.id, None);
        assert_eq!(player.lastname, "");
        assert!(!player.has_data());
    }

    #[test]
    fn test_player_deserialize_explicit_nulls() {
        let json = r#"{
            "id": 2,
            "firstname": null,
            "lastname": "Murray",
            "shortname": null,
            "country": {"code": null, "picture": null},
            "data": {"rank": 2, "weight": null, "last": null}
        }"#;
        let player: Player = serde_json::from_str(json).unwrap();

        assert_eq!(player.firstname, "");
        assert_eq!(player.shortname, None);
        assert!(!player.has_valid_country());
        let data = player.data.unwrap();
        assert_eq!(data.rank, Some(2));
        assert_eq!(data.weight, None);
        assert!(data.last.is_empty());
    }
}
