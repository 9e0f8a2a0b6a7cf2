//! Built-in descriptor for the rate card database.

use super::{ColumnSpec, Relationship, SchemaDescriptor, TableSpec};

type Column = (&'static str, &'static str, &'static str);

const RATES: &[Column] = &[
    ("RATE_ID", "Rate Id", "NUMBER"),
    ("DEAL_ID", "Deal Id refers to table DEAL and column DEAL_ID", "NUMBER(22,0)"),
    ("PRIORITY", "Priority (1 is highest)", "NUMBER(22,0)"),
    ("PRODUCT_TYPE", "Product Type", "VARCHAR2(10 BYTE)"),
    ("SUB_PRODUCT_TYPE", "Product Sub type", "VARCHAR2(10 BYTE)"),
    ("CURRENCY", "Currency (ISO 3 character code)", "VARCHAR2(10 BYTE)"),
    ("COUNTRY", "Country  Code", "VARCHAR2(10 BYTE)"),
    ("CMSN_TYPE", "Commission Type (cps=cents per share, bps=basis points)", "VARCHAR2(10 BYTE)"),
    ("CMSN_MIN", "Minimum Commission", "NUMBER(22,0)"),
    ("CMSN_MAX", "Maximum Commission", "NUMBER(22,0)"),
    ("TRADE_AREA", "Trade Area", "VARCHAR2(20 BYTE)"),
    (
        "REGION",
        "Region (NAM=North America,EMEA=EUROPE,APAC=Asiapac,UK=United Kingdom)",
        "VARCHAR2(10 BYTE)",
    ),
    ("GP_NUM", "Grandparent number", "VARCHAR2(10 BYTE)"),
    ("PRICE_MIN", "Minimum Price", "NUMBER(22,0)"),
    ("PRICE_MAX", "Maximum Price", "NUMBER(22,0)"),
    ("SIDE", "Side (S=Sell, B=Buy)", "VARCHAR2(10 BYTE)"),
    ("QUANTITY_MIN", "Minimum Quantity", "NUMBER(22,0)"),
    ("QUANTTITY_MAX", "Maximum Quantity", "NUMBER(22,0)"),
    (
        "RSCH_TYPE",
        "Research Fee Type (cps=cents per share, bps=basis points, rate=1 indicates 100%)",
        "VARCHAR2(10 BYTE)",
    ),
    ("RSCH_FEE", "Research Fee", "NUMBER(22,0)"),
    ("EXEC_TYPE", "Execution Fee Type (cps=cents per share, bps=basis points)", "VARCHAR2(10 BYTE)"),
    ("EXEC_FEE", "Execution Fee", "NUMBER(22,0)"),
    ("BEGIN_DATE", "Effective from", "DATE"),
    ("END_DATE", "Effective till", "DATE"),
    ("STATUS", "Status (1 is active, > 1 is not active)", "NUMBER(22,0)"),
    ("COMMENTS", "User comments", "VARCHAR2(255 BYTE)"),
    ("LAST_UPDATE_TIME", "Last Updated time", "TIMESTAMP(6)"),
    ("LAST_UPDATE_USER", "Last Updated user", "VARCHAR2(255 BYTE)"),
];

const CLIENT: &[Column] = &[
    ("CLIENT_ID", "Client ID ", "NUMBER"),
    ("GP_NUM", "Grandparent Number", "VARCHAR2(10 BYTE)"),
    ("CLIENT_NAME", "Client Name", "VARCHAR2(10 BYTE)"),
    ("PAYMENT_FREQUENCY", "Payment Frequency (1=Monthly,2=Yearly)", "NUMBER"),
    ("LAST_MODIFIED_USER", "Last Updated time", "VARCHAR2(20 BYTE)"),
    ("LAST_UPDATE_TIME", "Last Updated user", "TIMESTAMP(6)"),
];

const DEAL: &[Column] = &[
    ("DEAL_ID", "Deal Id", "NUMBER"),
    ("DEAL_MNC", "Deal Mnemonic", "VARCHAR2(20 BYTE)"),
    ("DEAL_TYPE", "Deal Type(1=Regular,4=Classic,2=Partial,3=Full)", "NUMBER(3,0)"),
    ("CLIENT_ID", "Client Id refers to the table CLIENT and column CLIENT_ID", "NUMBER(10,0)"),
    ("STATUS", "Status (1 is active, > 1 is not active)", "NUMBER(3,0)"),
    ("COST_CENTER", "Cost Center", "NUMBER(3,0)"),
    ("CURRENCY", "Currency (ISO 3 character code)", "VARCHAR2(20 BYTE)"),
    ("DEFAULT_DEAL", "Default Deal", "NUMBER(1,0)"),
    ("ELIGIBLE_CAPACITY", "Eligible Capacity", "NUMBER(3,0)"),
    ("DEFICIT_THRESHOLD", "Deficit Thresholdd Floa", "FLOAT"),
    ("BEGIN_DATE", "Begin Dated Date", "DATE"),
    ("NOTES", "Notes", "VARCHAR2(250 BYTE)"),
    ("BUNDLED_FLAG", "Bundled Flag", "NUMBER(1,0)"),
    ("CSA_CONNECT_MAKER_CHECKER", "CSA Connect Maker", "NUMBER(1,0)"),
    ("INVOICE_APPROVER_ELIGIBLE", "Invoice Approver", "NUMBER(1,0)"),
    ("DEAL_ASSOCIATE", "Deal Associate", "VARCHAR2(10 BYTE)"),
    ("DEAL_MANAGER", "Deal Manager", "VARCHAR2(10 BYTE)"),
    ("LAST_MODIFIED_USER", "Last Modified User", "VARCHAR2(10 BYTE)"),
    ("LAST_UPDATE_TIME", "Last Updated Time", "TIMESTAMP(6)"),
];

const TRADE: &[Column] = &[
    ("TRADE_ID", "Unique Id of the trade table", "NUMBER GENERATED BY DEFAULT AS IDENTITY"),
    ("DEAL_ID", "Deal Id refers to the table DEAL and column DEAL_ID", "NUMBER NOT NULL"),
    ("RATE_ID", "Rate Id refers to the table RATES and column RATE_ID", "NUMBER NOT NULL"),
    ("TRADEDATE", "Trade Date", "DATE"),
    ("PRODUCT_TYPE", "Product Type", "VARCHAR(10)"),
    ("SUB_PRODUCT_TYPE", "Product Sub type", "VARCHAR(10)"),
    ("CURRENCY", "Currency (ISO 3 character code)", "VARCHAR(10)"),
    ("COUNTRY", "Country  Code", "VARCHAR(10)"),
    ("GROSS_BPS", "Gross amount in bps", "NUMBER"),
    ("GROSS_CPS", "Gross amount in cps", "NUMBER"),
    ("TRADE_AREA", "Trading area", "VARCHAR(10)"),
    ("REGION", "Region (NAM,APAC,EMEA)", "VARCHAR(10)"),
    ("GP_NUM", "Grandparent number", "NUMBER"),
    ("PRICE", "Price", "NUMBER"),
    ("SIDE", "Side (b=buy,s=sell)", "VARCHAR(1)"),
    ("QUANTITY", "Trading quantity", "NUMBER"),
    ("PRIN_AMOUNT", "", "NUMBER"),
    ("GROSS_COMMISSION", "Gross Commission", "NUMBER"),
    ("EXECUTION_COMMISSION", "Execution commission", "NUMBER"),
    ("RESEARCH_COMMISSION", "Research Commission", "NUMBER"),
    ("CSA_STATUS", "CSA status (1 =active, 0=inactive)", "NUMBER"),
    ("EXCEPTION_CODE", "Exception code", "NUMBER"),
    ("HARD_CODED_RATE_FLAG", "Hard Coded Rate flag (1=hard coded)", "NUMBER"),
    ("HARD_CODED_RATE", "Hard coded rate indicate the overriden date by the user", "NUMBER"),
    ("HARD_CODE_RATE_TYPE", "Hard coded rate type (cps or bps)", "VARCHAR(10)"),
    ("LAST_UPDATE_USER", "User who modified this record", "VARCHAR2(50)"),
    ("LAST_UPDATE_TIME", "Time when the user modified the record", "TIMESTAMP(6)"),
];

const RELATIONSHIPS: &[(&str, &str, &str, &str)] = &[
    ("RATES", "DEAL_ID", "DEAL", "DEAL_ID"),
    ("DEAL", "CLIENT_ID", "CLIENT", "CLIENT_ID"),
    ("TRADE", "DEAL_ID", "DEAL", "DEAL_ID"),
    ("TRADE", "RATE_ID", "RATES", "RATE_ID"),
];

fn table(name: &str, columns: &[Column]) -> TableSpec {
    TableSpec {
        name: name.to_string(),
        columns: columns
            .iter()
            .map(|(name, description, data_type)| ColumnSpec {
                name: name.to_string(),
                description: description.to_string(),
                data_type: data_type.to_string(),
            })
            .collect(),
    }
}

pub fn rate_card() -> SchemaDescriptor {
    SchemaDescriptor {
        tables: vec![
            table("RATES", RATES),
            table("CLIENT", CLIENT),
            table("DEAL", DEAL),
            table("TRADE", TRADE),
        ],
        relationships: RELATIONSHIPS
            .iter()
            .map(|(from_table, from_column, to_table, to_column)| Relationship {
                from_table: from_table.to_string(),
                from_column: from_column.to_string(),
                to_table: to_table.to_string(),
                to_column: to_column.to_string(),
            })
            .collect(),
    }
}
