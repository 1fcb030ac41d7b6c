pub mod db {
    use anyhow::Result;
    use rusqlite::{OptionalExtension, Transaction};
    use std::cmp::Ordering;
    use std::path::Path;

    pub fn init_metadata_and_get_version(tx: &Transaction) -> Result<i32> {
        let create_db_metadata_sql = "
        CREATE TABLE IF NOT EXISTS `db_metadata` (
        `key`	TEXT NOT NULL,
        `value`	TEXT,
        PRIMARY KEY(`key`)
        )";
        tx.execute(create_db_metadata_sql, ())?;

        let version_str: Option<String> = tx
            .query_row(
                "SELECT `value` FROM `db_metadata` WHERE key='version'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(match version_str {
            None => 0,
            Some(s) => s.parse()?,
        })
    }

    pub fn set_version_in_metadata(tx: &Transaction, version: i32) -> Result<()> {
        tx.execute(
            "INSERT OR REPLACE INTO `db_metadata` (key, value) VALUES (?1, ?2)",
            ("version", version.to_string()),
        )?;
        Ok(())
    }

    /// Each migration brings the schema up by one version. Opening a db
    /// written by a newer build fails instead of guessing.
    #[allow(clippy::type_complexity)]
    pub fn open_db_and_run_migration(
        dir: &str,
        file_name: &str,
        migrations: &[&dyn Fn(&Transaction) -> Result<()>],
    ) -> Result<rusqlite::Connection> {
        debug!("open and run migration for {}", file_name);
        let mut conn = rusqlite::Connection::open(Path::new(dir).join(file_name))?;
        let tx = conn.transaction()?;

        let version = init_metadata_and_get_version(&tx)? as usize;
        let target_version = migrations.len();
        debug!(
            "current version = {}, target_version = {}",
            version, target_version
        );
        match version.cmp(&target_version) {
            Ordering::Equal => (),
            Ordering::Less => {
                for (i, migration) in migrations.iter().enumerate().skip(version) {
                    info!("running migration for version: {}", i + 1);
                    migration(&tx)?;
                }
                set_version_in_metadata(&tx, target_version as i32)?;
            }
            Ordering::Greater => {
                bail!(
                    "version too high: current version = {}, target_version = {}",
                    version,
                    target_version
                );
            }
        }
        tx.commit()?;
        Ok(conn)
    }

    pub fn run_sql_script(tx: &Transaction, sql: &str) -> Result<()> {
        for s in sql_split::split(sql) {
            tx.execute(&s, ())?;
        }
        Ok(())
    }
}
