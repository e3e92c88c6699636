//! Embedded default user profile schema.
//!
//! This is the flattened attribute list the console receives for a WSO2-style
//! user store, with core SCIM attributes, the enterprise extension, and the
//! custom `urn:scim:wso2:schema` extension attributes.

/// Returns the default user profile schema as a JSON array.
pub fn user_profile_schema() -> &'static str {
    r#"[
  { "name": "id", "mutability": "readOnly", "multiValued": false, "type": "STRING", "displayOrder": 0 },
  { "name": "userName", "mutability": "readOnly", "multiValued": false, "type": "STRING", "displayOrder": 1 },
  { "name": "name.givenName", "mutability": "readWrite", "multiValued": false, "type": "STRING", "displayOrder": 2 },
  { "name": "name.familyName", "mutability": "readWrite", "multiValued": false, "type": "STRING", "displayOrder": 3 },
  { "name": "nickName", "mutability": "readWrite", "multiValued": false, "type": "STRING", "displayOrder": 4 },
  { "name": "emails", "mutability": "readWrite", "multiValued": true, "type": "STRING", "displayOrder": 5 },
  { "name": "emails.work", "mutability": "readWrite", "multiValued": false, "type": "STRING", "displayOrder": 6 },
  { "name": "emails.home", "mutability": "readWrite", "multiValued": false, "type": "STRING", "displayOrder": 7 },
  { "name": "phoneNumbers.mobile", "mutability": "readWrite", "multiValued": false, "type": "STRING", "displayOrder": 8 },
  { "name": "phoneNumbers.home", "mutability": "readWrite", "multiValued": false, "type": "STRING", "displayOrder": 9 },
  { "name": "addresses.home", "mutability": "readWrite", "multiValued": false, "type": "STRING", "displayOrder": 10 },
  { "name": "photos.thumbnail", "mutability": "readWrite", "multiValued": false, "type": "STRING", "displayOrder": 11 },
  { "name": "locale", "mutability": "readWrite", "multiValued": false, "type": "STRING", "displayOrder": 12 },
  { "name": "roles.default", "mutability": "readWrite", "multiValued": false, "type": "STRING", "displayOrder": 13 },
  {
    "name": "accountLocked",
    "mutability": "readWrite",
    "multiValued": false,
    "extended": true,
    "type": "BOOLEAN",
    "displayOrder": 14
  },
  {
    "name": "country",
    "mutability": "readWrite",
    "multiValued": false,
    "extended": true,
    "type": "STRING",
    "displayOrder": 15
  },
  {
    "name": "manager.displayName",
    "mutability": "readWrite",
    "multiValued": false,
    "extended": true,
    "type": "STRING",
    "displayOrder": 16,
    "schemaId": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User"
  },
  {
    "name": "employeeNumber",
    "mutability": "readWrite",
    "multiValued": false,
    "extended": true,
    "type": "STRING",
    "displayOrder": 17,
    "schemaId": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User"
  },
  {
    "name": "lastLoginTime",
    "mutability": "readOnly",
    "multiValued": false,
    "extended": true,
    "type": "STRING",
    "displayOrder": 18
  }
]"#
}
