use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::NotSet, ConnectionTrait, Set};

use super::error::ImportError;
use super::importer::{ImportPolicy, RowPipeline};
use super::normalize::{
    NormalizationProfile, RowView, BRAND_LIST_PROFILE, PREDICT_PROFILE, STACK_LIST_PROFILE,
    SUPPLIES_PROFILE, TEMPERATURE_PROFILE,
};
use super::resolver::IdentityResolver;
use crate::entities::{brand, predict, stack, supplies, temperature};

/// Weights in tonnes are stored as `NUMERIC(15, 4)`.
const WEIGHT_PRECISION: u32 = 15;
const WEIGHT_SCALE: u32 = 4;
/// Temperatures are stored as `NUMERIC(5, 2)`.
const TEMPERATURE_PRECISION: u32 = 5;
const TEMPERATURE_SCALE: u32 = 2;

/// Columns every measurement row uses to find its brand and stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReferences {
    pub brand_name: String,
    pub warehouse_name: String,
    pub stack_number: String,
}

impl RowReferences {
    fn read(row: &RowView<'_>) -> Self {
        Self {
            brand_name: row.text("brand_name"),
            warehouse_name: row.text("warehouse_name"),
            stack_number: row.text("stack_number"),
        }
    }

    async fn resolve<C>(
        &self,
        resolver: &mut IdentityResolver,
        conn: &C,
    ) -> Result<(i32, i32), ImportError>
    where
        C: ConnectionTrait,
    {
        resolver
            .brand_and_stack(conn, &self.brand_name, &self.warehouse_name, &self.stack_number)
            .await
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SuppliesPipeline;

#[derive(Debug, Clone, PartialEq)]
pub struct SuppliesRow {
    pub references: RowReferences,
    pub warehouse_date: NaiveDate,
    pub warehouse_weight: Option<Decimal>,
    pub ship_date: Option<NaiveDate>,
    pub ship_weight: Option<Decimal>,
}

#[async_trait]
impl RowPipeline for SuppliesPipeline {
    type Row = SuppliesRow;
    type Model = supplies::ActiveModel;

    const POLICY: ImportPolicy = ImportPolicy::AllOrNothing;

    fn profile(&self) -> &'static NormalizationProfile {
        &SUPPLIES_PROFILE
    }

    fn normalize(&self, row: &RowView<'_>) -> Result<SuppliesRow, ImportError> {
        Ok(SuppliesRow {
            references: RowReferences::read(row),
            warehouse_date: row.date("warehouse_date")?,
            warehouse_weight: row.decimal("warehouse_weight", WEIGHT_PRECISION, WEIGHT_SCALE)?,
            ship_date: row.optional_date("ship_date")?,
            ship_weight: row.decimal("ship_weight", WEIGHT_PRECISION, WEIGHT_SCALE)?,
        })
    }

    async fn build<C>(
        &self,
        row: &SuppliesRow,
        resolver: &mut IdentityResolver,
        conn: &C,
    ) -> Result<supplies::ActiveModel, ImportError>
    where
        C: ConnectionTrait,
    {
        let (brand_id, stack_id) = row.references.resolve(resolver, conn).await?;
        Ok(supplies::ActiveModel {
            id: NotSet,
            brand_id: Set(brand_id),
            stack_id: Set(stack_id),
            warehouse_date: Set(row.warehouse_date),
            warehouse_weight: Set(row.warehouse_weight),
            ship_date: Set(row.ship_date),
            ship_weight: Set(row.ship_weight),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemperaturePipeline;

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureRow {
    pub references: RowReferences,
    pub max_temperature: Option<Decimal>,
    pub picket: String,
    pub act_date: NaiveDate,
    pub shift: Option<i32>,
}

#[async_trait]
impl RowPipeline for TemperaturePipeline {
    type Row = TemperatureRow;
    type Model = temperature::ActiveModel;

    const POLICY: ImportPolicy = ImportPolicy::AllOrNothing;

    fn profile(&self) -> &'static NormalizationProfile {
        &TEMPERATURE_PROFILE
    }

    fn normalize(&self, row: &RowView<'_>) -> Result<TemperatureRow, ImportError> {
        Ok(TemperatureRow {
            references: RowReferences::read(row),
            max_temperature: row.decimal(
                "max_temperature",
                TEMPERATURE_PRECISION,
                TEMPERATURE_SCALE,
            )?,
            picket: row.text("picket"),
            act_date: row.date("act_date")?,
            shift: row.optional_int("shift")?,
        })
    }

    async fn build<C>(
        &self,
        row: &TemperatureRow,
        resolver: &mut IdentityResolver,
        conn: &C,
    ) -> Result<temperature::ActiveModel, ImportError>
    where
        C: ConnectionTrait,
    {
        let (brand_id, stack_id) = row.references.resolve(resolver, conn).await?;
        Ok(temperature::ActiveModel {
            id: NotSet,
            brand_id: Set(brand_id),
            stack_id: Set(stack_id),
            max_temperature: Set(row.max_temperature),
            picket: Set(row.picket.clone()),
            act_date: Set(row.act_date),
            shift: Set(row.shift),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PredictPipeline;

#[derive(Debug, Clone, PartialEq)]
pub struct PredictRow {
    pub references: RowReferences,
    pub date: NaiveDate,
    pub weight: Option<f64>,
}

#[async_trait]
impl RowPipeline for PredictPipeline {
    type Row = PredictRow;
    type Model = predict::ActiveModel;

    const POLICY: ImportPolicy = ImportPolicy::AllOrNothing;

    fn profile(&self) -> &'static NormalizationProfile {
        &PREDICT_PROFILE
    }

    fn normalize(&self, row: &RowView<'_>) -> Result<PredictRow, ImportError> {
        Ok(PredictRow {
            references: RowReferences::read(row),
            date: row.date("date")?,
            weight: row.float("weight")?,
        })
    }

    async fn build<C>(
        &self,
        row: &PredictRow,
        resolver: &mut IdentityResolver,
        conn: &C,
    ) -> Result<predict::ActiveModel, ImportError>
    where
        C: ConnectionTrait,
    {
        let (brand_id, stack_id) = row.references.resolve(resolver, conn).await?;
        Ok(predict::ActiveModel {
            id: NotSet,
            brand_id: Set(brand_id),
            stack_id: Set(stack_id),
            date: Set(row.date),
            weight: Set(row.weight),
        })
    }
}

/// Brand name list. Names already on file are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrandListPipeline;

#[async_trait]
impl RowPipeline for BrandListPipeline {
    type Row = String;
    type Model = brand::ActiveModel;

    const POLICY: ImportPolicy = ImportPolicy::SkipRejected;

    fn profile(&self) -> &'static NormalizationProfile {
        &BRAND_LIST_PROFILE
    }

    fn normalize(&self, row: &RowView<'_>) -> Result<String, ImportError> {
        Ok(row.text("brand"))
    }

    async fn build<C>(
        &self,
        row: &String,
        _resolver: &mut IdentityResolver,
        _conn: &C,
    ) -> Result<brand::ActiveModel, ImportError>
    where
        C: ConnectionTrait,
    {
        Ok(brand::ActiveModel {
            id: NotSet,
            name: Set(row.clone()),
        })
    }
}

/// Stack list keyed by warehouse name. Unknown warehouses and stacks
/// already present in their warehouse are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackListPipeline;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackListRow {
    pub stack: String,
    pub warehouse_name: String,
}

#[async_trait]
impl RowPipeline for StackListPipeline {
    type Row = StackListRow;
    type Model = stack::ActiveModel;

    const POLICY: ImportPolicy = ImportPolicy::SkipRejected;

    fn profile(&self) -> &'static NormalizationProfile {
        &STACK_LIST_PROFILE
    }

    fn normalize(&self, row: &RowView<'_>) -> Result<StackListRow, ImportError> {
        Ok(StackListRow {
            stack: row.text("stack"),
            warehouse_name: row.text("warehouse_name"),
        })
    }

    async fn build<C>(
        &self,
        row: &StackListRow,
        resolver: &mut IdentityResolver,
        conn: &C,
    ) -> Result<stack::ActiveModel, ImportError>
    where
        C: ConnectionTrait,
    {
        let warehouse_id = resolver.warehouse_id(conn, &row.warehouse_name).await?;
        Ok(stack::ActiveModel {
            id: NotSet,
            name: Set(row.stack.clone()),
            warehouse_id: Set(warehouse_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::Table;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn first_row<P: RowPipeline>(pipeline: &P, csv: &str) -> Result<P::Row, ImportError> {
        let table = Table::parse(csv.as_bytes())?;
        let normalized = pipeline.profile().apply(&table)?;
        let row = normalized.rows().next().expect("one data row");
        pipeline.normalize(&row)
    }

    #[test]
    fn supplies_null_out_non_finite_weights() {
        let row = first_row(
            &SuppliesPipeline,
            "ВыгрузкаНаСклад,Наим. ЕТСНГ,Штабель,ПогрузкаНаСудно,На склад, тн,На судно, тн,Склад\n",
        );
        // The rename map keys contain commas, so real exports quote them
        assert_matches!(row, Err(ImportError::MissingColumns(_)));

        let row = first_row(
            &SuppliesPipeline,
            "ВыгрузкаНаСклад,Наим. ЕТСНГ,Штабель,ПогрузкаНаСудно,\"На склад, тн\",\"На судно, тн\",Склад\n\
             2024-03-01,A-1,5,,1234.56789,NaN,W1\n",
        )
        .unwrap();
        assert_eq!(row.warehouse_weight, Some(dec!(1234.5679)));
        assert_eq!(row.ship_weight, None);
        assert_eq!(row.ship_date, None);
        assert_eq!(row.references.stack_number, "5");
    }

    #[test]
    fn supplies_reject_weights_the_column_cannot_hold() {
        for weight in ["1e30", "1e12"] {
            let err = first_row(
                &SuppliesPipeline,
                &format!(
                    "ВыгрузкаНаСклад,Наим. ЕТСНГ,Штабель,ПогрузкаНаСудно,\"На склад, тн\",\"На судно, тн\",Склад\n\
                     2024-03-01,A-1,5,,{weight},,W1\n"
                ),
            )
            .unwrap_err();
            assert_matches!(
                err,
                ImportError::InvalidCell { row: 1, column: "warehouse_weight", .. }
            );
        }
    }

    #[test]
    fn temperature_defaults_picket_and_shift() {
        let row = first_row(
            &TemperaturePipeline,
            "Склад,Штабель,Марка,Максимальная температура,Пикет,Дата акта,Смена\n\
             W2,5,A-1,38.5,,2024-03-01 08:00,\n",
        )
        .unwrap();
        assert_eq!(row.picket, "");
        assert_eq!(row.shift, None);
        assert_eq!(row.max_temperature, Some(dec!(38.50)));
    }

    #[test]
    fn predict_requires_a_date() {
        let err = first_row(
            &PredictPipeline,
            "Дата начала,Груз,\"Вес по акту, тн\",Склад,Штабель\n,A-1,0.4,W1,5\n",
        )
        .unwrap_err();
        assert_matches!(err, ImportError::InvalidCell { column: "date", .. });
    }

    #[test]
    fn stack_list_reads_names_verbatim() {
        let row = first_row(&StackListPipeline, "stack,warehouse_name\n 7 ,Main\n").unwrap();
        assert_eq!(row.stack, " 7 ");
        assert_eq!(row.warehouse_name, "Main");
    }
}
