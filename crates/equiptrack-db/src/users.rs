use crate::{models, schema, sql_functions::lower, Error, Store};
use diesel::prelude::*;
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncConnection, RunQueryDsl};

impl Store {
    #[tracing::instrument(skip(self))]
    pub async fn load_user_by_email(
        &self,
        email_address: &str,
    ) -> Result<Option<models::User>, Error> {
        use schema::equiptrack::user::dsl::*;
        let mut conn = self.connection().await?;
        match user
            .filter(lower(email).eq(lower(email_address)))
            .select(models::User::as_select())
            .first(&mut conn)
            .await
        {
            Ok(loaded_user) => Ok(Some(loaded_user)),
            Err(diesel::result::Error::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Registers a new account. When no tenant is named a fresh one is
    /// created and the user becomes its `admin`; otherwise the named
    /// tenant must exist and the user joins it as `user`. Both rows are
    /// written in one transaction so a failed user insert cannot leave an
    /// orphan tenant behind.
    #[tracing::instrument(skip(self, password_hash))]
    pub async fn register_user(
        &self,
        email: String,
        password_hash: String,
        full_name: String,
        tenant_id: Option<String>,
    ) -> Result<models::User, Error> {
        let now: jiff_diesel::Timestamp = jiff::Timestamp::now().into();
        self.connection()
            .await?
            .transaction(|mut conn| {
                use schema::equiptrack::{tenant, user};
                async move {
                    let already_registered: i64 = user::table
                        .filter(lower(user::email).eq(lower(email.as_str())))
                        .count()
                        .get_result(&mut conn)
                        .await?;
                    if already_registered > 0 {
                        return Err(Error::Conflict("email is already registered".to_owned()));
                    }
                    let (resolved_tenant, role) = match tenant_id {
                        Some(existing) => {
                            let found: i64 = tenant::table
                                .filter(tenant::id.eq(&existing))
                                .count()
                                .get_result(&mut conn)
                                .await?;
                            if found == 0 {
                                return Err(Error::NotFound);
                            }
                            (existing, "user")
                        }
                        None => {
                            let new_tenant = models::NewTenant {
                                id: crate::generate_id("tenant"),
                                name: format!("{full_name} Company"),
                                domain: None,
                                plan: "free".to_owned(),
                                is_active: true,
                                created_at: now,
                            };
                            let created: models::Tenant = diesel::insert_into(tenant::table)
                                .values(new_tenant)
                                .returning(models::Tenant::as_returning())
                                .get_result(&mut conn)
                                .await?;
                            (created.id, "admin")
                        }
                    };
                    let new_user = models::NewUser {
                        id: crate::generate_id("user"),
                        email,
                        password_hash,
                        full_name,
                        role: role.to_owned(),
                        is_active: true,
                        tenant_id: resolved_tenant,
                        created_at: now,
                    };
                    diesel::insert_into(user::table)
                        .values(new_user)
                        .returning(models::User::as_returning())
                        .get_result(&mut conn)
                        .await
                        .map_err(crate::map_unique_violation)
                }
                .scope_boxed()
            })
            .await
    }
}
