//! Table definitions used by the Oracle integration tests

pub const CREATE_TABLE_LEGOSET: &str = "CREATE TABLE legoset (
    id          INTEGER PRIMARY KEY,
    version     INTEGER NULL,
    name        VARCHAR2(255) NOT NULL,
    manual      INTEGER NULL,
    cert        RAW(255) NULL
)";

pub const CREATE_TABLE_LEGOSET_WITH_ID_GENERATION: &str = "CREATE TABLE legoset (
    id          INTEGER GENERATED by default on null as IDENTITY PRIMARY KEY,
    version     INTEGER NULL,
    name        VARCHAR2(255) NOT NULL,
    flag        INTEGER NULL,
    manual      INTEGER NULL
)";

pub const CREATE_TABLE_LEGOSET_WITH_MIXED_CASE_NAMES: &str = "CREATE TABLE \"LegoSet\" (
    \"Id\"          INTEGER GENERATED by default on null as IDENTITY PRIMARY KEY,
    \"Name\"        VARCHAR2(255) NOT NULL,
    \"Manual\"      INTEGER NULL
)";

pub const DROP_TABLE_LEGOSET_WITH_MIXED_CASE_NAMES: &str = "DROP TABLE \"LegoSet\"";

pub const DROP_TABLE_LEGOSET: &str = "DROP TABLE legoset";
