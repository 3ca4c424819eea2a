use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub post_id: u64,
    pub name: String,
    pub body: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn post_id_is_read_from_camel_case() {
        let comment: Comment = serde_json::from_value(json!({
            "postId": 7,
            "id": 31,
            "name": "ut quo aut",
            "email": "Veronica_Goodwin@timmothy.net",
            "body": "voluptatem"
        }))
        .unwrap();
        assert_eq!(comment.post_id, 7);
        assert_eq!(comment.email, "Veronica_Goodwin@timmothy.net");
    }
}
